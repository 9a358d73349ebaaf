use anyhow::Result;
use env_logger::Env;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging with custom format
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    info!("Starting snapcal server");

    let port = parse_port_flag(std::env::args().skip(1))?;
    snapcal::run(port).await
}

fn parse_port_flag(args: impl Iterator<Item = String>) -> Result<Option<u16>> {
    let mut port = None;
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--port requires a value"))?;
                port = Some(value.parse()?);
            }
            other => {
                return Err(anyhow::anyhow!("Unknown argument: {}", other));
            }
        }
    }
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_flag() {
        let args = ["--port".to_string(), "8080".to_string()];
        assert_eq!(parse_port_flag(args.into_iter()).unwrap(), Some(8080));

        assert_eq!(parse_port_flag(std::iter::empty()).unwrap(), None);
        assert!(parse_port_flag(["--port".to_string()].into_iter()).is_err());
        assert!(parse_port_flag(["--bogus".to_string()].into_iter()).is_err());
    }
}
