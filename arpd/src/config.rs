use crate::error::SetupError;
use clap::{App, Arg, ArgMatches};
use std::net::Ipv4Addr;

pub fn app() -> App<'static, 'static> {
    App::new("arpd")
        .version("0.1")
        .author("arp-rs Contributors")
        .about("Answers ARP requests for this host and learns neighbours from ARP replies")
        .arg(
            Arg::with_name("address")
                .short("a")
                .long("address")
                .value_name("IFACE=IPV4")
                .help("Static IPv4 address for an interface, replacing the one found on the host")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("interface")
                .short("i")
                .long("interface")
                .value_name("IFACE")
                .help("Only manage the named interface (may be repeated)")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more (-v for debug, -vv for trace)"),
        )
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Explicit addresses, in command line order. A later entry for the same interface wins.
    pub addresses: Vec<(String, Ipv4Addr)>,
    /// Empty means every interface not on the ignore list.
    pub interfaces: Vec<String>,
    pub verbosity: u64,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches<'_>) -> Result<Self, SetupError> {
        let addresses = matches
            .values_of("address")
            .into_iter()
            .flatten()
            .map(parse_address)
            .collect::<Result<Vec<_>, _>>()?;
        let interfaces = matches
            .values_of("interface")
            .into_iter()
            .flatten()
            .map(String::from)
            .collect();

        Ok(Config {
            addresses,
            interfaces,
            verbosity: matches.occurrences_of("verbose"),
        })
    }

    pub fn selects(&self, name: &str) -> bool {
        self.interfaces.is_empty() || self.interfaces.iter().any(|iface| iface == name)
    }

    /// The address to answer for on `name`: an explicit one, else what the host has, else
    /// `0.0.0.0`.
    pub fn address_for(&self, name: &str, discovered: Option<Ipv4Addr>) -> Ipv4Addr {
        self.addresses
            .iter()
            .rev()
            .find(|(iface, _)| iface == name)
            .map(|(_, addr)| *addr)
            .or(discovered)
            .unwrap_or(Ipv4Addr::UNSPECIFIED)
    }

    /// Every interface named on the command line, explicitly or through an address.
    pub fn named_interfaces(&self) -> impl Iterator<Item = &str> {
        self.interfaces
            .iter()
            .map(String::as_str)
            .chain(self.addresses.iter().map(|(iface, _)| iface.as_str()))
    }

    /// Default filter directive when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub fn parse_address(arg: &str) -> Result<(String, Ipv4Addr), SetupError> {
    let mut parts = arg.splitn(2, '=');
    let (iface, addr) = match (parts.next(), parts.next()) {
        (Some(iface), Some(addr)) if !iface.is_empty() => (iface, addr),
        _ => return Err(SetupError::MalformedAddress(arg.to_string())),
    };
    let addr = addr
        .parse::<Ipv4Addr>()
        .map_err(|source| SetupError::InvalidAddress {
            interface: iface.to_string(),
            source,
        })?;
    Ok((iface.to_string(), addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config, SetupError> {
        let matches = app()
            .get_matches_from_safe(std::iter::once("arpd").chain(args.iter().copied()))
            .unwrap();
        Config::from_matches(&matches)
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.selects("eth0"));
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.address_for("eth0", None), Ipv4Addr::UNSPECIFIED);
        assert_eq!(
            config.address_for("eth0", Some(Ipv4Addr::new(192, 168, 1, 10))),
            Ipv4Addr::new(192, 168, 1, 10)
        );
    }

    #[test]
    fn explicit_address_overrides_host() {
        let config = config(&[
            "--address",
            "eth0=10.0.0.1",
            "-a",
            "eth1=10.0.1.1",
            "--address",
            "eth0=10.0.0.2",
        ])
        .unwrap();

        let host = Some(Ipv4Addr::new(192, 168, 1, 10));
        assert_eq!(config.address_for("eth0", host), Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(config.address_for("eth1", None), Ipv4Addr::new(10, 0, 1, 1));
        assert_eq!(config.address_for("eth2", host), Ipv4Addr::new(192, 168, 1, 10));
    }

    #[test]
    fn interface_selection() {
        let config = config(&["-i", "eth0", "--interface", "wlan0", "-vv"]).unwrap();
        assert!(config.selects("eth0"));
        assert!(config.selects("wlan0"));
        assert!(!config.selects("eth1"));
        assert_eq!(config.log_level(), "trace");
        assert_eq!(
            config.named_interfaces().collect::<Vec<_>>(),
            vec!["eth0", "wlan0"]
        );
    }

    #[test]
    fn bad_addresses() {
        assert!(matches!(
            parse_address("eth0"),
            Err(SetupError::MalformedAddress(_))
        ));
        assert!(matches!(
            parse_address("=10.0.0.1"),
            Err(SetupError::MalformedAddress(_))
        ));
        assert!(matches!(
            parse_address("eth0=10.0.0"),
            Err(SetupError::InvalidAddress { ref interface, .. }) if interface == "eth0"
        ));
        assert!(matches!(
            config(&["-a", "eth0=fe80::1"]),
            Err(SetupError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn address_names_an_interface() {
        let config = config(&["-a", "eth1=10.0.1.1"]).unwrap();
        assert_eq!(config.named_interfaces().collect::<Vec<_>>(), vec!["eth1"]);
        // an address alone does not restrict the managed set
        assert!(config.selects("eth0"));
    }
}
