//! iproute2-backed address probe.

use std::net::Ipv6Addr;
use std::process::Command;

use serde::Deserialize;

use super::{AddressProbe, ProbeError, ProbedPrefix};
use crate::session::{KERNEL_INFINITY, Lifetime};

/// Only networks of this length are advertised.
const PREFIX_LEN: u8 = 64;

/// One link entry of `ip -j addr show`.
#[derive(Debug, Deserialize)]
struct LinkEntry {
    #[serde(default)]
    addr_info: Vec<AddrInfo>,
}

/// One address of a link entry.
#[derive(Debug, Deserialize)]
struct AddrInfo {
    #[serde(default)]
    family: String,
    local: Option<String>,
    #[serde(default)]
    prefixlen: u8,
    #[serde(default)]
    scope: String,
    valid_life_time: Option<u64>,
    preferred_life_time: Option<u64>,
}

impl AddrInfo {
    /// Returns the /64 network of this address if it qualifies.
    fn network(&self) -> Option<String> {
        if self.family != "inet6" || self.scope != "global" || self.prefixlen != PREFIX_LEN {
            return None;
        }

        let addr: Ipv6Addr = self.local.as_deref()?.parse().ok()?;
        let net = Ipv6Addr::from(u128::from(addr) & (u128::MAX << (128 - PREFIX_LEN)));
        Some(format!("{net}/{PREFIX_LEN}"))
    }
}

/// Decodes `ip -j -6 addr show` output into probed prefixes.
///
/// Keeps global inet6 /64 addresses, masks each to its network and keeps the
/// first occurrence of every network. A missing lifetime counts as infinite.
///
/// # Errors
///
/// Returns [`ProbeError::Decode`] if the JSON is malformed.
pub fn parse_ip_json(json: &str) -> Result<Vec<ProbedPrefix>, ProbeError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let links: Vec<LinkEntry> = serde_json::from_str(json)?;
    let mut prefixes: Vec<ProbedPrefix> = Vec::new();

    for info in links.iter().flat_map(|link| &link.addr_info) {
        let Some(network) = info.network() else {
            continue;
        };
        if prefixes.iter().any(|p| p.prefix == network) {
            continue;
        }

        prefixes.push(ProbedPrefix::new(
            network,
            Lifetime::from_kernel(info.valid_life_time.unwrap_or(KERNEL_INFINITY)),
            Lifetime::from_kernel(info.preferred_life_time.unwrap_or(KERNEL_INFINITY)),
        ));
    }

    Ok(prefixes)
}

/// Probes interfaces by running `ip -j -6 addr show dev <iface> scope global`.
#[derive(Debug, Clone)]
pub struct IpCommandProbe {
    program: String,
}

impl IpCommandProbe {
    /// Creates a probe running `program` (normally `ip`).
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the program this probe runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for IpCommandProbe {
    fn default() -> Self {
        Self::new("ip")
    }
}

impl AddressProbe for IpCommandProbe {
    fn probe(&self, interface: &str) -> Result<Vec<ProbedPrefix>, ProbeError> {
        let output = Command::new(&self.program)
            .args(["-j", "-6", "addr", "show", "dev", interface, "scope", "global"])
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                program: self.program.clone(),
                interface: interface.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_ip_json(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[{"ifindex":3,"ifname":"lan1","flags":["BROADCAST","UP"],"mtu":1500,
        "addr_info":[
          {"family":"inet6","local":"2001:db8:1:0:1::1","prefixlen":64,"scope":"global",
           "dynamic":true,"valid_life_time":1800,"preferred_life_time":900},
          {"family":"inet6","local":"2001:db8:1::abcd","prefixlen":64,"scope":"global",
           "valid_life_time":1700,"preferred_life_time":800},
          {"family":"inet6","local":"fd00:9::1","prefixlen":64,"scope":"global",
           "valid_life_time":4294967295,"preferred_life_time":4294967295},
          {"family":"inet6","local":"2001:db8:2::1","prefixlen":56,"scope":"global",
           "valid_life_time":600,"preferred_life_time":300},
          {"family":"inet6","local":"fe80::1","prefixlen":64,"scope":"link",
           "valid_life_time":4294967295,"preferred_life_time":4294967295}
        ]}]"#;

    #[test]
    fn keeps_global_slash_64_networks_in_order() {
        let prefixes = parse_ip_json(SAMPLE).unwrap();

        let names: Vec<&str> = prefixes.iter().map(|p| p.prefix.as_str()).collect();
        assert_eq!(names, ["2001:db8:1::/64", "fd00:9::/64"]);
    }

    #[test]
    fn first_address_of_a_network_wins() {
        let prefixes = parse_ip_json(SAMPLE).unwrap();

        assert_eq!(prefixes[0].valid, Lifetime::Seconds(1800));
        assert_eq!(prefixes[0].preferred, Lifetime::Seconds(900));
    }

    #[test]
    fn kernel_forever_maps_to_infinity() {
        let prefixes = parse_ip_json(SAMPLE).unwrap();

        assert_eq!(prefixes[1].valid, Lifetime::Infinity);
        assert_eq!(prefixes[1].preferred, Lifetime::Infinity);
    }

    #[test]
    fn empty_outputs_yield_no_prefixes() {
        assert!(parse_ip_json("").unwrap().is_empty());
        assert!(parse_ip_json("[]").unwrap().is_empty());
        assert!(parse_ip_json("[{}]").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = parse_ip_json("[{").unwrap_err();
        assert!(matches!(err, ProbeError::Decode(_)));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let probe = IpCommandProbe::new("/nonexistent/radvd-regen-ip");
        let err = probe.probe("lan1").unwrap_err();

        assert!(matches!(err, ProbeError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/radvd-regen-ip"));
    }

    #[test]
    fn default_runs_ip() {
        assert_eq!(IpCommandProbe::default().program(), "ip");
    }
}
