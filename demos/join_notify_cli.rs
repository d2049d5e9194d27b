use clap::Parser;
use join_notify::{JoinClient, NotifierRegistry};
use reqwest::Url;
use serde_json::{Map, Value, json};

#[derive(Debug, Parser)]
struct Args {
    /// Join api key, required to notify a group
    #[arg(long, env = "JOIN_API_KEY")]
    api_key: Option<String>,
    /// Group of devices to notify: all, android, chrome, windows10, phone, tablet or pc
    #[arg(long)]
    group: Option<String>,
    /// Device to notify, can be repeated
    #[arg(long = "device")]
    devices: Vec<String>,
    /// Url opened when the notification is tapped
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    /// Also send the message as an SMS to this number
    #[arg(long)]
    sms_number: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    priority: Option<i64>,
    #[arg(long, default_value = join_notify::JOIN_URL)]
    endpoint: Url,
    title: String,
    message: String,
}

impl Args {
    /// Configuration the way a user would write it
    fn config(&self) -> Value {
        let mut config = Map::new();
        let mut set = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                config.insert(key.to_owned(), value);
            }
        };
        set("api_key", self.api_key.as_ref().map(|v| json!(v)));
        set("group", self.group.as_ref().map(|v| json!(v)));
        set(
            "device",
            match self.devices.as_slice() {
                [] => None,
                [device] => Some(json!(device)),
                devices => Some(json!(devices)),
            },
        );
        set("url", self.url.as_ref().map(|v| json!(v)));
        set("icon", self.icon.as_ref().map(|v| json!(v)));
        set("sms_number", self.sms_number.as_ref().map(|v| json!(v)));
        set("priority", self.priority.map(|v| json!(v)));
        Value::Object(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    let mut registry = NotifierRegistry::new();
    registry.register(JoinClient::with_url(args.endpoint.clone()).unwrap());

    log::info!("Sending notification");
    match registry
        .notify(JoinClient::NAME, &args.title, &args.message, &args.config())
        .await
    {
        Ok(()) => println!("Notification sent"),
        Err(e) => {
            eprintln!("Notification failed: {e}");
            std::process::exit(1);
        }
    }
}
