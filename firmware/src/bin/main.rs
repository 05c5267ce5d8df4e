#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use s107_ir::{
    uart_config, CommandBuffer, ControlLoop, CycleMonitor, Handshake, PacketTransmitter,
    SerialHostLink, PULSE_TIMING, UART_RX_BUFFER, UART_TX_BUFFER,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Latest command from the host, shared by the handshake and the transmitter.
static COMMAND_BUFFER: StaticCell<CommandBuffer<CriticalSectionRawMutex>> = StaticCell::new();

/// UART ring buffers.
static UART_TX_BUF: StaticCell<[u8; UART_TX_BUFFER]> = StaticCell::new();
static UART_RX_BUF: StaticCell<[u8; UART_RX_BUFFER]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("S107 IR transmitter starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Host link ---
    let tx_buf = UART_TX_BUF.init([0; UART_TX_BUFFER]);
    let rx_buf = UART_RX_BUF.init([0; UART_RX_BUFFER]);
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        tx_buf,
        rx_buf,
        uart_config(),
    );
    let link = SerialHostLink::new(uart);

    // --- Command buffer (starts neutral) ---
    let buffer = COMMAND_BUFFER.init(CommandBuffer::new());
    let (writer, reader) = buffer.split();

    // --- IR output ---
    let ir_line = Output::new(p.PIN_15, Level::Low);
    #[cfg(feature = "status-led")]
    let transmitter = PacketTransmitter::with_status(
        ir_line,
        Output::new(p.PIN_25, Level::Low),
        Delay,
        PULSE_TIMING,
    );
    #[cfg(not(feature = "status-led"))]
    let transmitter = PacketTransmitter::new(ir_line, Delay, PULSE_TIMING);

    let mut control = ControlLoop::new(Handshake::new(link, writer), reader, transmitter, Delay);
    let mut monitor = CycleMonitor::new();

    info!("S107 IR transmitter initialized, sending packets...");

    control.run_with(|report| monitor.observe(report)).await
}
