//! Language and display DIP switches.
//!
//! The PC1640 multiplexes its configuration switches onto the LPT1 status
//! port (0x379):
//!
//! ```text
//!   bits 7-6  display type
//!   bit 5     DIP latch (SW10 when set, SW9/none when clear)
//!   bits 2-0  keyboard/message language
//! ```

const LANGUAGE_MASK: u8 = 0x07;
const DIP_LATCH: u8 = 0x20;
const DISPLAY_SHIFT: u8 = 6;

/// Internal display adapter disabled.
const IDA_DISABLED: u8 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Diagnostic,
    Italian,
    Swedish,
    Danish,
    Spanish,
    French,
    German,
    English,
}

impl Language {
    pub fn from_code(code: u8) -> Self {
        match code & LANGUAGE_MASK {
            0 => Language::Diagnostic,
            1 => Language::Italian,
            2 => Language::Swedish,
            3 => Language::Danish,
            4 => Language::Spanish,
            5 => Language::French,
            6 => Language::German,
            _ => Language::English,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Diagnostic => "Diagnostic mode",
            Language::Italian => "Italian",
            Language::Swedish => "Swedish",
            Language::Danish => "Danish",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::English => "English",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    /// Built-in Paradise PEGA.
    Ega,
    /// Code 1 has no assigned meaning.
    Reserved,
    Cga,
    Mda,
}

impl DisplayType {
    pub fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => DisplayType::Ega,
            1 => DisplayType::Reserved,
            2 => DisplayType::Cga,
            _ => DisplayType::Mda,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayType::Ega => "EGA (built-in Paradise PEGA)",
            DisplayType::Reserved => "Unknown (reserved)",
            DisplayType::Cga => "CGA",
            DisplayType::Mda => "MDA/Hercules",
        }
    }
}

/// LPT1 status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LptStatus {
    pub raw: u8,
}

impl LptStatus {
    pub fn language(&self) -> Language {
        Language::from_code(self.raw)
    }

    /// `true` for SW10, `false` for SW9 or no latch.
    pub fn dip_latch(&self) -> bool {
        self.raw & DIP_LATCH != 0
    }

    pub fn display(&self) -> DisplayType {
        DisplayType::from_code(self.raw >> DISPLAY_SHIFT)
    }
}

/// Internal display adapter status (port 0x3DE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdaStatus {
    pub raw: u8,
}

impl IdaStatus {
    pub fn disabled(&self) -> bool {
        self.raw & IDA_DISABLED != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_decodes() {
        for raw in 0..=u8::MAX {
            let lpt = LptStatus { raw };
            assert_eq!(lpt.language().code(), raw & 0x07);
            assert_eq!(lpt.display().code(), raw >> 6);
        }
    }

    #[test]
    fn test_known_switches() {
        let lpt = LptStatus { raw: 0x26 };
        assert_eq!(lpt.language(), Language::German);
        assert!(lpt.dip_latch());
        assert_eq!(lpt.display(), DisplayType::Ega);

        let lpt = LptStatus { raw: 0x40 };
        assert_eq!(lpt.language().name(), "Diagnostic mode");
        assert_eq!(lpt.display().name(), "Unknown (reserved)");
    }

    #[test]
    fn test_ida_disabled_bit() {
        assert!(IdaStatus { raw: 0x20 }.disabled());
        assert!(!IdaStatus { raw: 0xdf }.disabled());
    }
}
