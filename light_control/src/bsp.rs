pub mod output {
    /// A binary output (for example a GPIO pin driving an LED), either high or low
    pub trait Output {
        fn set(&self, high: bool);
        fn is_high(&self) -> bool;
    }
}

/// Physical positions on the 40-pin header
pub mod header {
    pub const GREEN: u8 = 18;
    pub const AMBER: u8 = 16;
    pub const RED: u8 = 13;

    /// (board pin, BCM gpio) for every header position with a GPIO function.
    /// ID_SD and ID_SC (27, 28) are reserved for the HAT EEPROM and left out.
    const BOARD_TO_BCM: &'static [(u8, u8)] = &[
        (3, 2),
        (5, 3),
        (7, 4),
        (8, 14),
        (10, 15),
        (11, 17),
        (12, 18),
        (13, 27),
        (15, 22),
        (16, 23),
        (18, 24),
        (19, 10),
        (21, 9),
        (22, 25),
        (23, 11),
        (24, 8),
        (26, 7),
        (29, 5),
        (31, 6),
        (32, 12),
        (33, 13),
        (35, 19),
        (36, 16),
        (37, 26),
        (38, 20),
        (40, 21),
    ];

    /// Translates board numbering to the Broadcom numbering. None for power and ground pins.
    pub fn board_to_bcm(board: u8) -> Option<u8> {
        BOARD_TO_BCM
            .iter()
            .find(|(pin, _)| *pin == board)
            .map(|(_, bcm)| *bcm)
    }
}
