//! JSON output formatting

use crate::engine::InfoReport;

pub fn format_json(report: &InfoReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_format_json_fields() {
        let report = InfoReport {
            base_image: "dld/base:gpu".to_string(),
            lab_image: "dld/lab-tf1x:gpu".to_string(),
            lab_container: "alice-lab-tf1x".to_string(),
            mountpoint: "$HOME/projects:/workspace/projects".to_string(),
            notebook_dir: "/workspace/projects".to_string(),
            sshd_port: "9002:22".to_string(),
            jupyterlab_port: "9000:8888".to_string(),
            tensorboard_port: "9001:6006".to_string(),
            conflicting_ports: vec!["9001".to_string()],
            taken_ports: vec![9001],
        };

        let value: Value = serde_json::from_str(&format_json(&report)).unwrap();
        assert_eq!(value["lab_container"], "alice-lab-tf1x");
        assert_eq!(value["conflicting_ports"][0], "9001");
        assert_eq!(value["taken_ports"][0], 9001);
    }
}
