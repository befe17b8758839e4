use daimon_core::shell::{process_shell_batch, ShellBatchRequest};
use daimon_core::RequestError;

fn handle(input: &str) -> anyhow::Result<String> {
    let request: ShellBatchRequest = serde_json::from_str(input).map_err(RequestError::from)?;
    let response = process_shell_batch(&request);
    Ok(serde_json::to_string(&response)?)
}

pub fn run() -> anyhow::Result<()> {
    let input = super::read_stdin()?;
    println!("{}", handle(&input)?);
    Ok(())
}
