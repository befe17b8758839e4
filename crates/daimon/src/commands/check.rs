use daimon_core::{QuickCheckRequest, QuickCheckResponse};

fn check(prompt: &str) -> anyhow::Result<QuickCheckResponse> {
    let request = QuickCheckRequest::new(prompt.trim_end_matches(['\r', '\n']));
    Ok(request.evaluate()?)
}

pub fn run(prompt: Option<&str>) -> anyhow::Result<()> {
    let prompt = match prompt {
        Some(p) => p.to_string(),
        None => super::read_stdin()?,
    };

    let response = check(&prompt)?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
