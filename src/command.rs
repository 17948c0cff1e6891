use teloxide::{adaptors::Throttle, macros::BotCommands, prelude::Requester, types::BotCommand, Bot};

use crate::error::HandlerResult;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    Start,
    Help,
    Stats,
    Pro,
}

impl Command {
    pub fn user_commands() -> Vec<BotCommand> {
        vec![
            BotCommand::new("start", t!("commands.description.start")),
            BotCommand::new("help", t!("commands.description.help")),
            BotCommand::new("stats", t!("commands.description.stats")),
            BotCommand::new("pro", t!("commands.description.pro")),
        ]
    }
}

pub async fn setup_commands(bot: &Throttle<Bot>) -> HandlerResult<()> {
    bot.delete_my_commands().await?;
    bot.set_my_commands(Command::user_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::utils::command::BotCommands;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start", "javxar_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/stats", "javxar_bot").unwrap(), Command::Stats);
        assert_eq!(Command::parse("/pro@javxar_bot", "javxar_bot").unwrap(), Command::Pro);
        assert!(Command::parse("/unknown", "javxar_bot").is_err());
    }

    #[test]
    fn test_user_commands() {
        let commands = Command::user_commands();
        let names: Vec<_> = commands.iter().map(|c| c.command.as_str()).collect();

        assert_eq!(names, ["start", "help", "stats", "pro"]);
    }
}
