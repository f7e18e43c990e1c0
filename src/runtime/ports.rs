//! Host port usage parsed from `docker ps`

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::invocation::Invocation;
use super::runner::Runner;
use crate::error::Result;

/// Automatic port selection never goes below this
pub const AUTO_PORT_FLOOR: u32 = 9000;

pub const JUPYTERLAB_CONTAINER_PORT: u32 = 8888;
pub const TENSORBOARD_CONTAINER_PORT: u32 = 6006;
pub const SSHD_CONTAINER_PORT: u32 = 22;

/// `docker ps` output format: one `name ports` line per running container
pub const PS_FORMAT: &str = "{{.Names}} {{.Ports}}";

fn published_port_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}:([0-9]+)->")
            .expect("published port regex is valid")
    })
}

/// `<runtime> ps --format "{{.Names}} {{.Ports}}"`
pub fn ps_invocation(runtime: &str) -> Invocation {
    Invocation::new(runtime).args(["ps", "--format", PS_FORMAT])
}

/// Collect every published host port from `docker ps` output.
///
/// Lines whose container name equals `exclude` are skipped, as are numbers
/// that are not valid TCP ports.
pub fn parse_taken_ports(ps_output: &str, exclude: Option<&str>) -> BTreeSet<u32> {
    let re = published_port_regex();
    let mut taken = BTreeSet::new();

    for line in ps_output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let name = line.split_whitespace().next().unwrap_or_default();
        if exclude == Some(name) {
            continue;
        }
        for caps in re.captures_iter(line) {
            if let Ok(port) = caps[1].parse::<u16>() {
                taken.insert(u32::from(port));
            }
        }
    }

    taken
}

/// Raw `docker ps` listing of running containers and their ports
pub fn list_published<R: Runner>(runner: &mut R, runtime: &str) -> Result<String> {
    runner.capture(&ps_invocation(runtime))
}

/// Host part of a `host:container` mapping
pub fn host_port(mapping: &str) -> &str {
    mapping.split(':').next().unwrap_or(mapping)
}

/// Host ports of `mappings` that are already taken, in the given order
pub fn conflicting_ports<S: AsRef<str>>(mappings: &[S], taken: &BTreeSet<u32>) -> Vec<String> {
    mappings
        .iter()
        .map(|m| host_port(m.as_ref()))
        .filter(|host| host.parse::<u32>().map_or(false, |p| taken.contains(&p)))
        .map(str::to_string)
        .collect()
}

/// Three consecutive host ports above both `floor` and every taken port
pub fn next_free_block(taken: &BTreeSet<u32>, floor: u32) -> [u32; 3] {
    let start = taken.iter().next_back().copied().unwrap_or(floor).max(floor);
    [start + 1, start + 2, start + 3]
}

/// JupyterLab, TensorBoard and sshd mappings for an automatically chosen block
pub fn auto_port_mappings(taken: &BTreeSet<u32>) -> [String; 3] {
    let [jl, tb, sshd] = next_free_block(taken, AUTO_PORT_FLOOR);
    [
        format!("{}:{}", jl, JUPYTERLAB_CONTAINER_PORT),
        format!("{}:{}", tb, TENSORBOARD_CONTAINER_PORT),
        format!("{}:{}", sshd, SSHD_CONTAINER_PORT),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS: &str = "\
alice-lab-tf1x 0.0.0.0:9000->8888/tcp, 0.0.0.0:9001->6006/tcp, 0.0.0.0:9002->22/tcp
bob-lab-tf2x 0.0.0.0:8889->8888/tcp, :::8889->8888/tcp
redis 6379/tcp
";

    fn set(ports: &[u32]) -> BTreeSet<u32> {
        ports.iter().copied().collect()
    }

    #[test]
    fn test_parse_taken_ports() {
        assert_eq!(parse_taken_ports(PS, None), set(&[8889, 9000, 9001, 9002]));
    }

    #[test]
    fn test_parse_excludes_own_container() {
        assert_eq!(parse_taken_ports(PS, Some("alice-lab-tf1x")), set(&[8889]));
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_taken_ports("", None).is_empty());
        assert!(parse_taken_ports("\n\n", None).is_empty());
    }

    #[test]
    fn test_parse_skips_out_of_range_ports() {
        let ps = "odd 0.0.0.0:4294967295->80/tcp, 0.0.0.0:70000->81/tcp, 0.0.0.0:65535->82/tcp";
        assert_eq!(parse_taken_ports(ps, None), set(&[65535]));
    }

    #[test]
    fn test_auto_block_after_out_of_range_port() {
        let taken = parse_taken_ports("odd 0.0.0.0:99999999999->80/tcp", None);
        assert_eq!(auto_port_mappings(&taken), ["9001:8888", "9002:6006", "9003:22"]);
    }

    #[test]
    fn test_conflicts_are_intersection() {
        let taken = parse_taken_ports("lab 0.0.0.0:9001->9001/tcp", None);
        let desired = ["9000:8888", "9001:6006", "9002:22"];
        assert_eq!(conflicting_ports(&desired, &taken), vec!["9001"]);
    }

    #[test]
    fn test_conflicts_keep_desired_order() {
        let taken = set(&[9002, 9000]);
        let desired = ["9002:22", "8889:8888", "9000:6006"];
        assert_eq!(conflicting_ports(&desired, &taken), vec!["9002", "9000"]);
    }

    #[test]
    fn test_malformed_mapping_never_conflicts() {
        let taken = set(&[9000]);
        assert!(conflicting_ports(&["garbage"], &taken).is_empty());
    }

    #[test]
    fn test_next_free_block_above_highest_taken() {
        assert_eq!(next_free_block(&set(&[9000, 9003]), 9000), [9004, 9005, 9006]);
    }

    #[test]
    fn test_next_free_block_respects_floor() {
        assert_eq!(next_free_block(&set(&[22, 8889]), 9000), [9001, 9002, 9003]);
        assert_eq!(next_free_block(&BTreeSet::new(), 9000), [9001, 9002, 9003]);
    }

    #[test]
    fn test_next_free_block_numeric_order() {
        // lexicographic order would pick 9999 over 10000
        assert_eq!(next_free_block(&set(&[9999, 10000]), 9000), [10001, 10002, 10003]);
    }

    #[test]
    fn test_auto_port_mappings() {
        assert_eq!(
            auto_port_mappings(&set(&[9000, 9003])),
            ["9004:8888", "9005:6006", "9006:22"]
        );
    }

    #[test]
    fn test_ps_invocation() {
        let inv = ps_invocation("docker");
        assert_eq!(inv.args, vec!["ps", "--format", "{{.Names}} {{.Ports}}"]);
    }
}
