use candle_core::Device;
use tracing::info;

/// Pick the compute device. Metal is tried only when the `metal` feature is
/// enabled and `APP_DEVICE` is not `cpu`.
pub fn select_device() -> Device {
    let force_cpu = std::env::var("APP_DEVICE").map(|v| v.eq_ignore_ascii_case("cpu")).unwrap_or(false);
    #[cfg(feature = "metal")]
    {
        if !force_cpu {
            if let Ok(dev) = Device::new_metal(0) { info!("device: Metal (MPS)"); return dev; }
        }
    }
    info!(force_cpu, "device: CPU");
    Device::Cpu
}
