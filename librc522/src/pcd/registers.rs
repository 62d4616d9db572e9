// librc522-rs/librc522/src/pcd/registers.rs

//! Register map, command set and analog gain settings of the reader chip.
//!
//! Register values are the datasheet addresses. Bus framing (the SPI
//! address byte with its read/write flag) is applied by the transport, so
//! the rest of the driver works in datasheet terms only.

/// Reader chip registers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Starts and stops command execution
    Command = 0x01,
    /// Interrupt request enable bits, communication group
    ComIEn = 0x02,
    /// Interrupt request enable bits, coprocessor group
    DivIEn = 0x03,
    /// Interrupt request flags, communication group
    ComIrq = 0x04,
    /// Interrupt request flags, coprocessor group
    DivIrq = 0x05,
    /// Error flags of the last command
    Error = 0x06,
    /// Communication status, first bank
    Status1 = 0x07,
    /// Communication status, second bank (crypto-on flag lives here)
    Status2 = 0x08,
    /// Input and output of the 64 byte FIFO
    FifoData = 0x09,
    /// Number of bytes stored in the FIFO
    FifoLevel = 0x0A,
    /// FIFO underflow and overflow warning level
    WaterLevel = 0x0B,
    /// Miscellaneous control, holds the valid-bits count of the last byte
    Control = 0x0C,
    /// Bit-oriented frame adjustments
    BitFraming = 0x0D,
    /// First bit collision position
    Coll = 0x0E,
    /// General transmit and receive mode
    Mode = 0x11,
    /// Transmit data rate and framing
    TxMode = 0x12,
    /// Receive data rate and framing
    RxMode = 0x13,
    /// Antenna driver pin control
    TxControl = 0x14,
    /// Transmit modulation setting
    TxAsk = 0x15,
    /// Antenna driver input selection
    TxSel = 0x16,
    /// Contactless interface input selection
    RxSel = 0x17,
    /// Bit decoder thresholds
    RxThreshold = 0x18,
    /// Demodulator settings
    Demod = 0x19,
    /// MIFARE transmit parameters
    MfTx = 0x1C,
    /// MIFARE receive parameters
    MfRx = 0x1D,
    /// Serial UART speed
    SerialSpeed = 0x1F,
    /// CRC coprocessor result, high byte
    CrcResultH = 0x21,
    /// CRC coprocessor result, low byte
    CrcResultL = 0x22,
    /// Modulation width
    ModWidth = 0x24,
    /// Receiver gain configuration
    RfCfg = 0x26,
    /// Conductance of the antenna driver when no modulation is on
    GsN = 0x27,
    /// Conductance for the continuous wave phase
    CwGsP = 0x28,
    /// Conductance for the modulation phase
    ModGsP = 0x29,
    /// Timer mode and high prescaler bits
    TMode = 0x2A,
    /// Timer prescaler, low byte
    TPrescaler = 0x2B,
    /// Timer reload, high byte
    TReloadH = 0x2C,
    /// Timer reload, low byte
    TReloadL = 0x2D,
    /// Timer current value, high byte
    TCounterValH = 0x2E,
    /// Timer current value, low byte
    TCounterValL = 0x2F,
    /// General test signal configuration
    TestSel1 = 0x31,
    /// Test signal configuration and parity kill
    TestSel2 = 0x32,
    /// Pin output driver enable on D1..D7
    TestPinEn = 0x33,
    /// Pin values for D1..D7
    TestPinValue = 0x34,
    /// Test bus status
    TestBus = 0x35,
    /// Digital self test control
    AutoTest = 0x36,
    /// Firmware revision
    Version = 0x37,
    /// Analog test pin control
    AnalogTest = 0x38,
    /// Test value for TestDac1
    TestDac1 = 0x39,
    /// Test value for TestDac2
    TestDac2 = 0x3A,
    /// ADC test values
    TestAdc = 0x3B,
}

impl Register {
    /// The 6-bit datasheet address.
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Commands accepted by the Command register.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcdCommand {
    /// Cancel the running command
    Idle = 0x00,
    /// Store 25 FIFO bytes into the internal buffer
    Mem = 0x01,
    /// Generate a 10 byte random ID number
    GenerateRandomId = 0x02,
    /// Run the CRC coprocessor over the FIFO
    CalcCrc = 0x03,
    /// Transmit the FIFO
    Transmit = 0x04,
    /// Modify Command register bits without touching the command
    NoCmdChange = 0x07,
    /// Activate the receiver
    Receive = 0x08,
    /// Transmit the FIFO, then activate the receiver
    Transceive = 0x0C,
    /// Run MIFARE Crypto1 authentication as a reader
    MfAuthent = 0x0E,
    /// Reset the chip
    SoftReset = 0x0F,
}

/// Receiver gain, bits 6..4 of RfCfg.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum AntennaGain {
    /// 18 dB
    #[display(fmt = "18 dB")]
    Db18 = 0,
    /// 23 dB
    #[display(fmt = "23 dB")]
    Db23 = 1,
    /// Duplicate encoding of 18 dB
    #[display(fmt = "18 dB")]
    Db18Alt = 2,
    /// Duplicate encoding of 23 dB
    #[display(fmt = "23 dB")]
    Db23Alt = 3,
    /// 33 dB, the power-on default
    #[display(fmt = "33 dB")]
    Db33 = 4,
    /// 38 dB
    #[display(fmt = "38 dB")]
    Db38 = 5,
    /// 43 dB
    #[display(fmt = "43 dB")]
    Db43 = 6,
    /// 48 dB
    #[display(fmt = "48 dB")]
    Db48 = 7,
}

impl AntennaGain {
    /// Lowest gain the receiver supports.
    pub const MIN: Self = Self::Db18;
    /// Power-on default.
    pub const AVG: Self = Self::Db33;
    /// Highest gain, longest read range.
    pub const MAX: Self = Self::Db48;

    /// Decode bits 6..4 of an RfCfg read.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Db18,
            1 => Self::Db23,
            2 => Self::Db18Alt,
            3 => Self::Db23Alt,
            4 => Self::Db33,
            5 => Self::Db38,
            6 => Self::Db43,
            _ => Self::Db48,
        }
    }
}
