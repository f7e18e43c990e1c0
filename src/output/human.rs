//! Human-readable output formatting

use crate::engine::InfoReport;

pub fn format_human(report: &InfoReport) -> String {
    let conflicting = if report.conflicting_ports.is_empty() {
        "[]".to_string()
    } else {
        report.conflicting_ports.join(", ")
    };
    let taken = report
        .taken_ports
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Base image: {}\n\
         Lab image: {}\n\
         Lab container: {}\n\
         Mountpoint: {}\n\
         Notebook dir: {}\n\
         SSHD ports: {}\n\
         Jupyterlab ports: {}\n\
         Tensorboard ports: {}\n\
         Conflicting ports: {}\n\
         Taken ports: {}",
        report.base_image,
        report.lab_image,
        report.lab_container,
        report.mountpoint,
        report.notebook_dir,
        report.sshd_port,
        report.jupyterlab_port,
        report.tensorboard_port,
        conflicting,
        taken
    )
}
