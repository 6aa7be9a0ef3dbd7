mod config;
mod error;
mod reactor;

use arp_rs_afpacket::{is_ignored, Device};
use arp_rs_runtime::{
    arp::{ArpEngine, ArpTable},
    dispatch::Dispatcher,
};
use config::{app, Config};
use error::{Error, SetupError};
use reactor::Reactor;
use std::process;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = app().get_matches();
    let config = Config::from_matches(&matches);

    let level = config.as_ref().map(Config::log_level).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = config.map_err(Error::from).and_then(|config| {
        let mut reactor = setup(&config)?;
        info!("Managing {} interfaces", reactor.len());
        reactor.run()
    });
    if let Err(err) = result {
        error!("{}", err);
        process::exit(1);
    }
}

fn setup(config: &Config) -> Result<Reactor<Device>, Error> {
    let interfaces = afpacket::interfaces().map_err(SetupError::Enumerate)?;

    for name in config.named_interfaces() {
        if is_ignored(name) || !interfaces.iter().any(|iface| iface.name == name) {
            return Err(SetupError::UnknownInterface(name.to_string()).into());
        }
    }

    let mut reactor = Reactor::new(ArpEngine::new(ArpTable::new()));
    for iface in &interfaces {
        if is_ignored(&iface.name) || !config.selects(&iface.name) {
            debug!("Skipping interface {}", iface.name);
            continue;
        }

        let device = Device::open(iface)?;
        let ipv4 = config.address_for(device.name(), device.ipv4());
        let dispatcher = Dispatcher::new(device.context(ipv4));
        if dispatcher.context().is_configured() {
            info!("Answering for {} on {}", ipv4, device.name());
        } else {
            warn!(
                "{} has no IPv4 address, ARP replies on it will not be learned",
                device.name()
            );
        }
        reactor.add(device, dispatcher);
    }

    if reactor.is_empty() {
        return Err(SetupError::NoInterfaces.into());
    }
    Ok(reactor)
}
