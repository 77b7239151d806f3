use crate::{api::models::AccessToken, config::NodeConfig};
use anyhow::anyhow;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
pub enum AccessCommands {
    /// Issue a bearer token for the event stream routes
    Issue {
        /// Token subject, recorded in the gateway logs
        #[structopt(short = "s", long)]
        subject: String,
        /// Token lifetime in minutes
        #[structopt(short = "m", long, default_value = "60")]
        minutes: u64,
    },
}

impl AccessCommands {
    pub fn run(self, node_config: NodeConfig) -> anyhow::Result<()> {
        let secret = node_config
            .auth
            .event_streams_secret
            .ok_or_else(|| anyhow!("auth.event_streams_secret is not configured, event stream routes are open"))?;

        match self {
            Self::Issue { subject, minutes } => {
                let token = encode(
                    &Header::new(Algorithm::HS256),
                    &AccessToken::new(subject, minutes),
                    &EncodingKey::from_secret(secret.as_bytes()),
                )?;
                println!("{}", token);
            },
        };
        Ok(())
    }
}
