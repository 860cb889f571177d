pub const DEFAULT_ADDRESS: u8 = 0x70;
pub const DEFAULT_READ_ADDRESS: u8 = 0x48; // 0x90 in 8-bit write form
pub const MAX_POSITIONS: u8 = 5;
pub const MAX_VALUE: u32 = 99_999;
pub const BUFFER_LEN: usize = MAX_POSITIONS as usize * 2;
pub const BRIGHTNESS: u8 = 0x08; // 4 bits, 0-15

// bit 0: top, 1: upper right, 2: lower right, 3: bottom, 4: lower left, 5: upper left, 6: middle
pub const NUMBERS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];
pub const SEGMENTS_NONE: u8 = 0x00;
pub const SEGMENTS_ALL: u8 = 0x7F;

// buffer slot for positions 1..=5, rightmost first
pub(crate) const POSITION_SLOTS: [usize; MAX_POSITIONS as usize] = [9, 7, 5, 3, 1];

pub mod command {
    pub const DISPLAY_RAM: u8 = 0x00; // display data address pointer, first byte of a frame
    pub const SYSTEM_SETUP: u8 = 0x20;
    pub const DISPLAY_SETUP: u8 = 0x80;
    pub const DIMMING: u8 = 0xE0;

    pub mod system_setup {
        pub const OSCILLATOR_OFF: u8 = 0x00; // bit 0 clear: standby
        pub const OSCILLATOR_ON: u8 = 0x01; // bit 0 set: normal operation
    }

    pub mod display_setup {
        pub const DISPLAY_ON: u8 = 0x01; // bit 0: display on
        pub const BLINK_OFF: u8 = 0x00; // bits 2:1: blinking off
    }
}
