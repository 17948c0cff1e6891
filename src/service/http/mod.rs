use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "JavxarBot/1.0";

/// Image generation can take well over a minute.
pub fn create_openai_client() -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .timeout(Duration::from_secs(180))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90));

    build_client(builder)
}

fn build_client(builder: ClientBuilder) -> Result<Client, reqwest::Error> {
    builder.user_agent(DEFAULT_USER_AGENT).build()
}
