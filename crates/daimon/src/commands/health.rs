use daimon_telemetry::Paths;
use daimon_watch::HealthProbe;

pub fn run(noesis_url: Option<&str>, reflector_url: Option<&str>) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let mut config = super::load_config(&paths);
    if let Some(url) = noesis_url {
        config.noesis_url = url.to_string();
    }
    if let Some(url) = reflector_url {
        config.reflector_url = url.to_string();
    }

    let probe = HealthProbe::new(config.health_timeout)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let (noesis, reflector) = runtime.block_on(async {
        tokio::join!(
            probe.check(&config.noesis_url),
            probe.check(&config.reflector_url)
        )
    });

    println!("DAIMON Status");
    println!("=============");
    println!("NOESIS ({}): {}", config.noesis_url, noesis);
    println!("Reflector ({}): {}", config.reflector_url, reflector);
    Ok(())
}
