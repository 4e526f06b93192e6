//! Environmental controller firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter        UartSerial     NvsAdapter            │
//! │  (relays, SD log,       (SerialPort)   (ConfigPort)          │
//! │   EEPROM image, clock)  LogEventSink                         │
//! │                         (EventSink)                          │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              Controller (pure logic)                   │  │
//! │  │  dispatch · arbiter · fan test · log queries           │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  Poll loop: serial → dispatch, then supervisory tick         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_svc::fs::fatfs::Fatfs;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::sd::{spi::SdSpiHostDriver, SdCardConfiguration, SdCardDriver};
use esp_idf_svc::hal::spi::{config::DriverConfig, Dma, SpiDriver};
use esp_idf_svc::hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_svc::io::vfs::MountedFatfs;

use envctl::adapters::eeprom::EepromImage;
use envctl::adapters::hardware::{HardwareAdapter, RelayBank};
use envctl::adapters::log_sink::LogEventSink;
use envctl::adapters::nvs::NvsAdapter;
use envctl::adapters::sd_log::{SdLogStore, SD_MOUNT_POINT};
use envctl::adapters::serial::UartSerial;
use envctl::adapters::time::SystemClock;
use envctl::app::controller::Controller;
use envctl::app::ports::ConfigPort;
use envctl::config::ControllerConfig;
use envctl::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  envctl v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take().context("Peripherals::take")?;

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {}", e))?;
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            ControllerConfig::default()
        }
    };

    // ── 3. Relay outputs ──────────────────────────────────────
    // SAFETY: each GPIO number is used exactly once and by nothing else.
    let relays = unsafe {
        RelayBank::new(
            PinDriver::output(AnyOutputPin::new(pins::HEAT_GPIO))?,
            PinDriver::output(AnyOutputPin::new(pins::FAN_GPIO))?,
            PinDriver::output(AnyOutputPin::new(pins::PUMP_GPIO))?,
            PinDriver::output(AnyOutputPin::new(pins::LIGHT_GPIO))?,
        )
    };
    info!("Relays ready (all LOW)");

    // ── 4. SD card log volume ─────────────────────────────────
    let spi = SpiDriver::new(
        peripherals.spi2,
        unsafe { AnyOutputPin::new(pins::SD_SCLK_GPIO) },
        unsafe { AnyOutputPin::new(pins::SD_MOSI_GPIO) },
        Some(unsafe { AnyIOPin::new(pins::SD_MISO_GPIO) }),
        &DriverConfig::default().dma(Dma::Auto(4096)),
    )
    .context("SpiDriver::new")?;
    let sd_card = SdCardDriver::new_spi(
        SdSpiHostDriver::new(
            spi,
            Some(unsafe { AnyOutputPin::new(pins::SD_CS_GPIO) }),
            AnyIOPin::none(),
            AnyIOPin::none(),
            AnyIOPin::none(),
            None,
        )?,
        &SdCardConfiguration::new(),
    )
    .context("SdCardDriver::new_spi")?;
    let _mounted = MountedFatfs::mount(Fatfs::new_sdcard(0, sd_card)?, SD_MOUNT_POINT, 4)
        .context("mount SD card")?;
    let log_store = SdLogStore::new(SD_MOUNT_POINT)?;

    // ── 5. Console UART ───────────────────────────────────────
    let uart = UartDriver::new(
        peripherals.uart0,
        unsafe { AnyIOPin::new(pins::UART_TX_GPIO) },
        unsafe { AnyIOPin::new(pins::UART_RX_GPIO) },
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(config.serial_baud)),
    )
    .context("UartDriver::new")?;
    let mut serial = UartSerial::new(uart);
    info!("Console UART ready at {} bps", config.serial_baud);

    // ── 6. Assemble the controller ────────────────────────────
    let mut hw = HardwareAdapter::new(relays, log_store, EepromImage::new(nvs), SystemClock::new());
    let mut sink = LogEventSink::new();
    let poll = Duration::from_millis(u64::from(config.poll_interval_ms));

    let mut controller = Controller::new(config);
    controller.start(&mut hw);

    // ── 7. Poll loop ──────────────────────────────────────────
    loop {
        controller.poll_serial(&mut serial, &mut hw, &mut sink);
        controller.supervise(&mut hw, &mut serial, &mut sink);
        std::thread::sleep(poll);
    }
}
