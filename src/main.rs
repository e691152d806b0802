// Copyright 2025 DevInfo Desktop Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod config;
mod device_info;
mod info_screen;
mod launch_screen;
mod navigation;
mod widgets;

use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use netinfo_client::{MonitorConfig, NetworkMonitor, ProbeConfig};

use crate::config::AppConfig;
use crate::device_info::SystemDeviceInfo;
use crate::info_screen::DeviceInfoScreen;
use crate::launch_screen::LaunchScreen;
use crate::navigation::{Screen, ScreenStack};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Device and network diagnostics for developers
#[derive(Debug, Parser)]
#[command(name = "devinfo-desktop", version)]
struct Args {
    /// Probe targets (host:port) overriding the configured list for this session
    #[arg(long = "probe-target", value_name = "HOST:PORT")]
    probe_targets: Vec<String>,

    /// Probe interval in seconds for this session
    #[arg(long, value_name = "SECS")]
    probe_interval: Option<u64>,
}

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let args = Args::parse();

    let config = AppConfig::load().expect("failed to load configuration");

    // Persist immediately so the install id generated on first run is stable
    if let Err(e) = config.save() {
        warn!("Failed to persist configuration: {e}");
    }

    let mut probe = config.probe_config();
    if !args.probe_targets.is_empty() {
        probe.targets = args.probe_targets;
    }
    if let Some(secs) = args.probe_interval {
        probe.interval = Duration::from_secs(secs);
    }

    info!("Starting DevInfo Desktop, probing {:?}", probe.targets);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 720.0])
            .with_title("DevInfo Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "DevInfo Desktop",
        options,
        Box::new(move |_cc| Ok(Box::new(DevInfoApp::new(config, probe)))),
    )
}

struct DevInfoApp {
    config: AppConfig,
    device_info: SystemDeviceInfo,
    monitor: NetworkMonitor,
    nav: ScreenStack,
    launch: LaunchScreen,
    info: Option<DeviceInfoScreen>,
}

impl DevInfoApp {
    fn new(config: AppConfig, probe: ProbeConfig) -> Self {
        let monitor = NetworkMonitor::spawn(MonitorConfig {
            probe,
            ..Default::default()
        });
        let device_info = SystemDeviceInfo::new(config.install_id.clone());

        Self {
            config,
            device_info,
            monitor,
            nav: ScreenStack::new(Screen::Launch),
            launch: LaunchScreen,
            info: None,
        }
    }

    /// Build the diagnostics screen and attach its observer.
    fn open_device_info(&mut self, ctx: &egui::Context) {
        let size = ctx.screen_rect().size();
        let mut screen = DeviceInfoScreen::new(
            &self.device_info,
            Some((size.x, size.y)),
            self.config.history_policy(),
        );
        screen.mount(&self.monitor);

        self.info = Some(screen);
        self.nav.push(Screen::DeviceInfo);
    }
}

impl eframe::App for DevInfoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.nav.current() {
            Screen::Launch => {
                if self.launch.render(ctx) == Some(Screen::DeviceInfo) {
                    self.open_device_info(ctx);
                }
            }
            Screen::DeviceInfo => {
                if let Some(screen) = self.info.as_mut() {
                    screen.render(ctx, &mut self.nav);
                }
            }
        }

        // Tear down the diagnostics screen once navigation has left it
        if self.nav.current() == Screen::Launch {
            if let Some(mut screen) = self.info.take() {
                screen.unmount();
            }
        }

        // Surface connectivity changes without waiting for input events
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}
