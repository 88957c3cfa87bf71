#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use core::net::Ipv4Addr;
use core::str::FromStr;

use embassy_executor::Spawner;
use embassy_net::Stack;
use embassy_time::{Duration as EmbassyDuration, Timer, WithTimeout};
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    rmt::{Rmt, TxChannelConfig, TxChannelCreator as _},
    time::{Instant, Rate},
    timer::timg::TimerGroup,
};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController};
use log::{LevelFilter, info};
use pointdash_core::app::{GameApp, TickResult};
use pointdash_hal_esp32::{
    input::{ButtonConfig, ButtonTrio, joystick::Joystick},
    led::StatusLed,
    network::{WifiConfig, http::BackendClient},
    render as oled,
};
use static_cell::StaticCell;

const LOOP_PERIOD_MS: u64 = 10;
// ~30 ms of stable samples at the loop period.
const BUTTON_DEBOUNCE_POLLS: u8 = 3;
const DISPLAY_I2C_HZ: u32 = 400_000;
const RMT_CLOCK_MHZ: u32 = 40;
const WIFI_RETRY_BACKOFF_MIN_SECS: u64 = 2;
const WIFI_RETRY_BACKOFF_MAX_SECS: u64 = 120;
const NETWORK_POLL_INTERVAL_MS: u64 = 500;
const DHCP_TIMEOUT_SECS: u64 = 15;

const WIFI_SSID: &str = env!(
    "POINTDASH_WIFI_SSID",
    "Set POINTDASH_WIFI_SSID in your environment before building/flashing."
);
const WIFI_PASSWORD: &str = env!(
    "POINTDASH_WIFI_PASSWORD",
    "Set POINTDASH_WIFI_PASSWORD in your environment before building/flashing."
);
const BACKEND_HOST: &str = env!(
    "POINTDASH_BACKEND_HOST",
    "Set POINTDASH_BACKEND_HOST (IPv4 of the game backend) before building/flashing."
);
const BACKEND_PORT: &str = env!(
    "POINTDASH_BACKEND_PORT",
    "Set POINTDASH_BACKEND_PORT before building/flashing."
);
const WIFI_CONFIG: WifiConfig = WifiConfig::new(WIFI_SSID, WIFI_PASSWORD);

static NET_RESOURCES: StaticCell<embassy_net::StackResources<4>> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

fn wifi_retry_backoff_secs(consecutive_failures: u32) -> u64 {
    // 2, 4, 8, 16, 32, 64, 120, 120, ...
    let shift = consecutive_failures.min(6);
    WIFI_RETRY_BACKOFF_MIN_SECS
        .saturating_mul(1u64 << shift)
        .min(WIFI_RETRY_BACKOFF_MAX_SECS)
}

async fn wait_before_wifi_retry(consecutive_failures: &mut u32) {
    let delay_secs = wifi_retry_backoff_secs(*consecutive_failures);
    *consecutive_failures = consecutive_failures.saturating_add(1);
    info!(
        "wifi retrying in {}s (consecutive_failures={})",
        delay_secs, *consecutive_failures
    );
    Timer::after_secs(delay_secs).await;
}

async fn wifi_connection_loop(wifi_controller: &mut WifiController<'_>, stack: Stack<'_>) -> ! {
    let mut consecutive_failures = 0u32;

    loop {
        if !wifi_controller.is_started().unwrap_or(false) {
            if let Err(err) = wifi_controller.start_async().await {
                info!("wifi start failed: {:?}", err);
                wait_before_wifi_retry(&mut consecutive_failures).await;
                continue;
            }
        }

        if let Err(err) = wifi_controller.connect_async().await {
            info!("wifi connect failed: {:?}", err);
            let _ = wifi_controller.disconnect_async().await;
            wait_before_wifi_retry(&mut consecutive_failures).await;
            continue;
        }

        match stack
            .wait_config_up()
            .with_timeout(EmbassyDuration::from_secs(DHCP_TIMEOUT_SECS))
            .await
        {
            Ok(()) => info!("wifi connected and dhcp ready"),
            Err(_) => {
                info!("dhcp timeout; forcing reconnect");
                let _ = wifi_controller.disconnect_async().await;
                wait_before_wifi_retry(&mut consecutive_failures).await;
                continue;
            }
        }

        consecutive_failures = 0;

        loop {
            let link_up = stack.is_link_up();
            let has_ipv4 = stack.config_v4().is_some();
            let is_connected = matches!(wifi_controller.is_connected(), Ok(true));

            if !(link_up && has_ipv4 && is_connected) {
                info!(
                    "wifi state lost (link_up={} has_ipv4={} connected={}); reconnecting",
                    link_up, has_ipv4, is_connected
                );
                break;
            }

            Timer::after_millis(NETWORK_POLL_INTERVAL_MS).await;
        }

        let _ = wifi_controller.disconnect_async().await;
        wait_before_wifi_retry(&mut consecutive_failures).await;
    }
}

async fn wait_for_network(stack: Stack<'_>) {
    loop {
        if stack.is_link_up()
            && let Some(config) = stack.config_v4()
        {
            info!("network ready: ip={}", config.address);
            return;
        }
        Timer::after_millis(NETWORK_POLL_INTERVAL_MS).await;
    }
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: pointdash starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // esp-radio requires an allocator.
    esp_alloc::heap_allocator!(size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // OLED wiring: SCL=GPIO22, SDA=GPIO23, address 0x3C.
    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_hz(DISPLAY_I2C_HZ)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO23)
    .with_scl(peripherals.GPIO22);
    let mut display = oled::init(i2c);
    esp_println::println!("display: init ok (SCL=22 SDA=23)");

    // Buttons: UP=GPIO14, DOWN=GPIO15, OK=GPIO32, active-low with pull-ups.
    let input_cfg = InputConfig::default().with_pull(Pull::Up);
    let button_up = Input::new(peripherals.GPIO14, input_cfg);
    let button_down = Input::new(peripherals.GPIO15, input_cfg);
    let button_confirm = Input::new(peripherals.GPIO32, input_cfg);
    let buttons = ButtonTrio::new(
        button_up,
        button_down,
        button_confirm,
        ButtonConfig::default().with_debounce_polls(BUTTON_DEBOUNCE_POLLS),
    )
    .unwrap();

    // Joystick potentiometers on ADC1: X=GPIO34, Y=GPIO36.
    let joystick = Joystick::new(peripherals.ADC1, peripherals.GPIO34, peripherals.GPIO36);

    // Status NeoPixel on GPIO27 via RMT.
    let rmt = Rmt::new(peripherals.RMT, Rate::from_mhz(RMT_CLOCK_MHZ)).unwrap();
    let led_channel = rmt
        .channel0
        .configure_tx(
            peripherals.GPIO27,
            TxChannelConfig::default().with_clk_divider(1),
        )
        .unwrap();
    let mut led = StatusLed::new(led_channel);

    let radio = match esp_radio::init() {
        Ok(radio) => radio,
        Err(err) => {
            info!("esp-radio init failed: {:?}", err);
            loop {
                Timer::after_secs(1).await;
            }
        }
    };

    let (mut wifi_controller, interfaces) =
        match esp_radio::wifi::new(&radio, peripherals.WIFI, esp_radio::wifi::Config::default()) {
            Ok(parts) => parts,
            Err(err) => {
                info!("wifi peripheral init failed: {:?}", err);
                loop {
                    Timer::after_secs(1).await;
                }
            }
        };

    let client_config = ClientConfig::default()
        .with_ssid(WIFI_CONFIG.ssid.into())
        .with_password(WIFI_CONFIG.password.into());
    let wifi_mode = ModeConfig::Client(client_config);
    if let Err(err) = wifi_controller.set_config(&wifi_mode) {
        info!("wifi mode config failed: {:?}", err);
        loop {
            Timer::after_secs(1).await;
        }
    }

    let stack_config = embassy_net::Config::dhcpv4(Default::default());
    let (stack, mut net_runner) = embassy_net::new(
        interfaces.sta,
        stack_config,
        NET_RESOURCES.init(embassy_net::StackResources::<4>::new()),
        0x7D31_55C0_A2E4_9F08,
    );

    let backend_host = match Ipv4Addr::from_str(BACKEND_HOST) {
        Ok(host) => host,
        Err(_) => {
            info!("POINTDASH_BACKEND_HOST is not a valid IPv4 address");
            loop {
                Timer::after_secs(1).await;
            }
        }
    };
    let backend_port: u16 = match BACKEND_PORT.parse() {
        Ok(port) => port,
        Err(_) => {
            info!("POINTDASH_BACKEND_PORT is not a valid port");
            loop {
                Timer::after_secs(1).await;
            }
        }
    };
    let mut backend = BackendClient::new(stack, backend_host, backend_port);

    let mut app = GameApp::new(buttons, joystick);

    info!("Display pins: SCL=GPIO22 SDA=GPIO23 addr=0x3C");
    info!("Button pins: UP=GPIO14 DOWN=GPIO15 OK=GPIO32");
    info!("Joystick pins: X=GPIO34 Y=GPIO36 (ADC1)");
    info!("Status LED: WS2812 on GPIO27 (RMT)");
    info!("Backend endpoint: {}:{}", backend_host, backend_port);

    let net_future = net_runner.run();
    let wifi_future = wifi_connection_loop(&mut wifi_controller, stack);
    let game_future = async {
        // The session loop starts once the stack has an address; afterwards
        // the Wi-Fi supervisor reconnects in the background and requests
        // fail as transport errors while the link is down.
        wait_for_network(stack).await;

        let loop_start = Instant::now();
        loop {
            let now_ms = loop_start.elapsed().as_millis();
            let render_due = app.tick(now_ms) == TickResult::RenderRequested;

            if let Some(request) = app.take_request() {
                // One round-trip per iteration; the loop intentionally
                // stalls here, matching the session semantics.
                let response = backend.execute(&request).await;
                app.apply_response(loop_start.elapsed().as_millis(), response);
            }

            if render_due {
                app.with_screen(now_ms, |screen| oled::render(&mut display, &screen));
            }

            if let Some(color) = app.take_led_update()
                && led.set(color).is_err()
            {
                info!("status led update failed");
            }

            Timer::after_millis(LOOP_PERIOD_MS).await;
        }
    };

    let _ = embassy_futures::join::join3(net_future, wifi_future, game_future).await;
    unreachable!()
}
