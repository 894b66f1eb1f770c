//! SAMD51 DAC driven through its memory-mapped register block.
//!
//! The DAC needs a status poll before every write (channel READY) and a
//! sync wait after it (SYNCBUSY.DATAx). Both spins happen inside
//! [`WaveformSink::write_sample`], i.e. in the timer interrupt.
//!
//! ```text
//! 0x00 CTRLA   0x01 CTRLB   0x02 EVCTRL   0x03 -
//! 0x04 INTENCLR 0x05 INTENSET 0x06 INTFLAG 0x07 STATUS
//! 0x08 SYNCBUSY (32 bit)
//! 0x0C DACCTRL0/1 (16 bit)
//! 0x10 DATA0/1    (16 bit)
//! ```

use volatile_register::{RO, RW};

use crate::audio::WaveformSink;

/// DAC peripheral base address on SAMD51
pub const DAC_BASE: usize = 0x4300_2400;

/// CTRLA.ENABLE
const CTRLA_ENABLE: u8 = 1 << 1;
/// SYNCBUSY.ENABLE
const SYNCBUSY_ENABLE: u32 = 1 << 1;

/// DAC register block (head of the SAMD51 `Dac` layout)
#[repr(C)]
pub struct DacRegisters {
    pub ctrla: RW<u8>,
    pub ctrlb: RW<u8>,
    pub evctrl: RW<u8>,
    _reserved: u8,
    pub intenclr: RW<u8>,
    pub intenset: RW<u8>,
    pub intflag: RW<u8>,
    pub status: RO<u8>,
    pub syncbusy: RO<u32>,
    pub dacctrl: [RW<u16>; 2],
    pub data: [RW<u16>; 2],
}

/// DAC output channel. The speaker sits on channel 1 (pin DAC1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DacChannel {
    Ch0 = 0,
    Ch1 = 1,
}

impl DacChannel {
    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// STATUS.READYx
    #[inline]
    const fn ready_mask(self) -> u8 {
        1 << self.index()
    }

    /// SYNCBUSY.DATAx
    #[inline]
    const fn data_busy_mask(self) -> u32 {
        1 << (2 + self.index())
    }
}

/// Waveform sink writing one DAC channel
pub struct SamdDacSink<'r> {
    regs: &'r DacRegisters,
    channel: DacChannel,
}

impl<'r> SamdDacSink<'r> {
    /// Wrap a register block. Clock and pin mux are configured elsewhere.
    pub fn new(regs: &'r DacRegisters, channel: DacChannel) -> Self {
        Self { regs, channel }
    }

    /// Channel being driven
    pub fn channel(&self) -> DacChannel {
        self.channel
    }

    fn wait_enable_sync(&self) {
        while self.regs.syncbusy.read() & SYNCBUSY_ENABLE != 0 {
            core::hint::spin_loop();
        }
    }
}

impl SamdDacSink<'static> {
    /// Sink on the on-chip DAC.
    ///
    /// # Safety
    ///
    /// Must run on a SAMD51 and nothing else may drive the same channel.
    pub unsafe fn take(channel: DacChannel) -> Self {
        Self::new(&*(DAC_BASE as *const DacRegisters), channel)
    }
}

impl WaveformSink for SamdDacSink<'_> {
    #[inline]
    fn write_sample(&mut self, level: u16) {
        let ch = self.channel;

        while self.regs.status.read() & ch.ready_mask() == 0 {
            core::hint::spin_loop();
        }

        // SAFETY: `regs` points at a DAC register block for our lifetime
        unsafe { self.regs.data[ch.index()].write(level) };

        while self.regs.syncbusy.read() & ch.data_busy_mask() != 0 {
            core::hint::spin_loop();
        }
    }

    fn enable(&mut self) {
        // SAFETY: as above
        unsafe { self.regs.ctrla.modify(|v| v | CTRLA_ENABLE) };
        self.wait_enable_sync();
    }

    fn disable(&mut self) {
        // SAFETY: as above
        unsafe { self.regs.ctrla.modify(|v| v & !CTRLA_ENABLE) };
        self.wait_enable_sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    /// Plain memory standing in for the peripheral
    #[repr(C, align(4))]
    struct FakeDac([u8; size_of::<DacRegisters>()]);

    impl FakeDac {
        fn ready() -> Self {
            let mut mem = [0u8; size_of::<DacRegisters>()];
            mem[offset_of!(DacRegisters, status)] = 0b11; // READY0 | READY1
            Self(mem)
        }

        fn regs(&mut self) -> &DacRegisters {
            unsafe { &*(self.0.as_mut_ptr() as *const DacRegisters) }
        }

        fn data(&self, ch: usize) -> u16 {
            let at = offset_of!(DacRegisters, data) + ch * 2;
            u16::from_ne_bytes([self.0[at], self.0[at + 1]])
        }
    }

    #[test]
    fn test_register_layout_matches_datasheet() {
        assert_eq!(offset_of!(DacRegisters, status), 0x07);
        assert_eq!(offset_of!(DacRegisters, syncbusy), 0x08);
        assert_eq!(offset_of!(DacRegisters, dacctrl), 0x0C);
        assert_eq!(offset_of!(DacRegisters, data), 0x10);
    }

    #[test]
    fn test_write_sample_hits_selected_channel() {
        let mut fake = FakeDac::ready();
        {
            let mut sink = SamdDacSink::new(fake.regs(), DacChannel::Ch1);
            sink.write_sample(1023);
        }
        assert_eq!(fake.data(1), 1023);
        assert_eq!(fake.data(0), 0);
    }

    #[test]
    fn test_enable_sets_ctrla_bit() {
        let mut fake = FakeDac::ready();
        {
            let mut sink = SamdDacSink::new(fake.regs(), DacChannel::Ch0);
            sink.enable();
        }
        assert_eq!(fake.0[0] & CTRLA_ENABLE, CTRLA_ENABLE);
        {
            let mut sink = SamdDacSink::new(fake.regs(), DacChannel::Ch0);
            sink.disable();
        }
        assert_eq!(fake.0[0] & CTRLA_ENABLE, 0);
    }

    #[test]
    fn test_channel_masks() {
        assert_eq!(DacChannel::Ch0.ready_mask(), 0b01);
        assert_eq!(DacChannel::Ch1.ready_mask(), 0b10);
        assert_eq!(DacChannel::Ch0.data_busy_mask(), 1 << 2);
        assert_eq!(DacChannel::Ch1.data_busy_mask(), 1 << 3);
    }
}
