use daimon_core::session::{record_session_end, SessionEndRequest};
use daimon_core::RequestError;

fn handle(input: &str) -> anyhow::Result<String> {
    let request: SessionEndRequest = serde_json::from_str(input).map_err(RequestError::from)?;
    Ok(serde_json::to_string(&record_session_end(&request))?)
}

pub fn run() -> anyhow::Result<()> {
    let input = super::read_stdin()?;
    println!("{}", handle(&input)?);
    Ok(())
}
