//! Status Panel
//!
//! Host summary from `/status.json`, refetched on every render request.

use leptos::*;

use crate::api::{fetch_status, CpuTimes, StatusSnapshot};
use crate::state::use_runtime;

/// Human readable byte count (binary units)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Uptime as `[Nd ]HH:MM:SS`
pub fn format_uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if days > 0 {
        format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[component]
fn Card(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="card">
            <div class="label">{label}</div>
            <div class="value">{value}</div>
        </div>
    }
}

/// Bytes received and sent on every interface except loopback
pub fn network_totals(status: &StatusSnapshot) -> Option<(u64, u64)> {
    let mut totals = None;
    for (name, counters) in &status.machine.network {
        if name == "lo" {
            continue;
        }
        let (rx, tx) = totals.unwrap_or((0u64, 0u64));
        totals = Some((
            rx.saturating_add(counters.rx_bytes),
            tx.saturating_add(counters.tx_bytes),
        ));
    }
    totals
}

fn cards(status: StatusSnapshot, cpu_busy: Option<f64>) -> impl IntoView {
    let machine = &status.machine;

    let uptime = machine
        .uptime_secs
        .map(format_uptime)
        .unwrap_or_else(|| "-".to_string());
    let load = machine
        .load_avg
        .map(|l| format!("{:.2} {:.2} {:.2}", l.one, l.five, l.fifteen))
        .unwrap_or_else(|| "-".to_string());
    let memory = match (machine.memory_used(), machine.memory_total()) {
        (Some(used), Some(total)) => format!("{} / {}", format_bytes(used), format_bytes(total)),
        _ => "-".to_string(),
    };
    let cpu = cpu_busy
        .map(|busy| format!("{:.1}%", busy))
        .unwrap_or_else(|| "-".to_string());
    let open_files = machine
        .open_files
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let network = network_totals(&status)
        .map(|(rx, tx)| format!("{} in / {} out", format_bytes(rx), format_bytes(tx)))
        .unwrap_or_else(|| "-".to_string());
    let last_scan = status
        .last_scan
        .map(format_timestamp)
        .unwrap_or_else(|| "pending".to_string());

    view! {
        <h2>{status.hostname.clone()}</h2>
        <div class="grid">
            <Card label="Uptime" value=uptime />
            <Card label="CPU" value=cpu />
            <Card label="Load average" value=load />
            <Card label="Memory" value=memory />
            <Card label="Open files" value=open_files />
            <Card label="Network" value=network />
            <Card label="Scans" value=status.scans.to_string() />
            <Card label="Last scan" value=last_scan />
            <Card label="Scan time" value=format!("{} ms", status.scan_duration_ms) />
            <Card label="Dashboards" value=status.connections.to_string() />
        </div>
    }
}

#[component]
pub fn StatusPanel() -> impl IntoView {
    let runtime = use_runtime();
    let mount = runtime.mount;

    // keyed on the render generation: each signal from the agent refetches
    let status = create_local_resource(move || mount.generation(), |_| fetch_status());
    // cpu sample behind the one on screen, for usage between scans
    let previous_cpu = store_value(None::<CpuTimes>);

    view! {
        <section>
            {move || match status.get() {
                None => view! { <p>"Loading..."</p> }.into_view(),
                Some(Ok(status)) => {
                    let cpu_busy = status.machine.cpu.and_then(|cpu| {
                        let busy = previous_cpu.with_value(|prev| cpu.busy_percent(prev.as_ref()));
                        previous_cpu.set_value(Some(cpu));
                        busy
                    });
                    cards(status, cpu_busy).into_view()
                }
                Some(Err(e)) => view! {
                    <p class="error">{format!("Cannot read agent status: {}", e)}</p>
                }.into_view(),
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KiB");
        assert_eq!(format_bytes(16318412 * 1024), "15.6 GiB");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59.9), "00:00:59");
        assert_eq!(format_uptime(3723.0), "01:02:03");
        assert_eq!(format_uptime(350735.47), "4d 01:25:35");
        assert_eq!(format_uptime(-5.0), "00:00:00");
    }

    #[test]
    fn test_network_totals_skip_loopback() {
        let json = r#"{"version": "0.4.13", "pid": 1, "hostname": "h", "startup_time": 0,
            "machine": {"network": {
                "lo": {"rx_bytes": 1000, "tx_bytes": 1000},
                "eth0": {"rx_bytes": 10, "tx_bytes": 20},
                "wlan0": {"rx_bytes": 5, "tx_bytes": 1}}}}"#;
        let status: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(network_totals(&status), Some((15, 21)));

        let loopback_only = r#"{"version": "0.4.13", "pid": 1, "hostname": "h", "startup_time": 0,
            "machine": {"network": {"lo": {"rx_bytes": 1, "tx_bytes": 1}}}}"#;
        let status: StatusSnapshot = serde_json::from_str(loopback_only).unwrap();
        assert_eq!(network_totals(&status), None);
    }

    #[test]
    fn test_format_timestamp_invalid() {
        assert_eq!(format_timestamp(i64::MAX), "-");
    }
}
