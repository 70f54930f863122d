use anyhow::bail;
use mealmind_client::{logging, AppState};

const USAGE: &str = "usage: mealmind-client [barcode <code> | coach <question>]";

#[derive(Debug, PartialEq)]
enum Command {
    Check,
    Barcode(String),
    Coach(String),
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let Some(name) = args.first() else {
        return Ok(Command::Check);
    };
    match name.as_str() {
        "barcode" => match args.get(1).map(|c| c.trim()).filter(|c| !c.is_empty()) {
            Some(code) => Ok(Command::Barcode(code.to_string())),
            None => bail!("missing barcode\n{USAGE}"),
        },
        "coach" => {
            let question = args[1..].join(" ");
            if question.trim().is_empty() {
                bail!("missing question\n{USAGE}");
            }
            Ok(Command::Coach(question.trim().to_string()))
        }
        other => bail!("unknown command: {other}\n{USAGE}"),
    }
}

/// Smoke entry point: `mealmind-client [barcode <code> | coach <question>]`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;
    let state = AppState::init()?;

    match command {
        Command::Barcode(code) => {
            let product = state.api.lookup_barcode(&code).await?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        Command::Coach(question) => {
            let reply = state.api.get_chat_response(&question, &[]).await?;
            println!("{reply}");
        }
        Command::Check => tracing::info!("configuration ok"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(parse_command(&args(&["barcode"])).is_err());
        assert!(parse_command(&args(&["barcode", "  "])).is_err());
        assert!(parse_command(&args(&["coach"])).is_err());
        assert!(parse_command(&args(&["coach", " "])).is_err());
        assert!(parse_command(&args(&["scan"])).is_err());
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_command(&[]).unwrap(), Command::Check);
        assert_eq!(
            parse_command(&args(&["barcode", "12345"])).unwrap(),
            Command::Barcode("12345".into())
        );
        assert_eq!(
            parse_command(&args(&["coach", "how", "much", "protein?"])).unwrap(),
            Command::Coach("how much protein?".into())
        );
    }
}
