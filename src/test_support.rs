use embedded_hal::adc::{Channel, OneShot};

/// An ADC whose conversion never finishes.
pub struct BusyAdc;

pub struct BusyChannel;

impl Channel<BusyAdc> for BusyChannel {
    type ID = u8;

    fn channel() -> u8 {
        0
    }
}

impl OneShot<BusyAdc, u16, BusyChannel> for BusyAdc {
    type Error = ();

    fn read(&mut self, _pin: &mut BusyChannel) -> nb::Result<u16, ()> {
        Err(nb::Error::WouldBlock)
    }
}
