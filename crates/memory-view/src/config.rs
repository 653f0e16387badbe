//! Display configuration for the memory view.

use crate::PointerRegister;

/// Marker visibility settings supplied by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ViewConfig {
    /// Shows the register A pointer marker.
    pub display_a: bool,
    /// Shows the register B pointer marker.
    pub display_b: bool,
    /// Shows the register C pointer marker.
    pub display_c: bool,
    /// Shows the register D pointer marker.
    pub display_d: bool,
    /// Highlights cells holding mapped instructions.
    pub show_instructions: bool,
}

impl ViewConfig {
    /// Returns whether the pointer marker of `register` is shown.
    ///
    /// Stack and instruction pointers are always shown.
    #[must_use]
    pub const fn displays(&self, register: PointerRegister) -> bool {
        match register {
            PointerRegister::A => self.display_a,
            PointerRegister::B => self.display_b,
            PointerRegister::C => self.display_c,
            PointerRegister::D => self.display_d,
            PointerRegister::Ssp | PointerRegister::Usp | PointerRegister::Ip => true,
        }
    }

    /// Sets marker visibility for a general register.
    ///
    /// Returns `false` for registers whose marker is always shown.
    pub const fn set_display(&mut self, register: PointerRegister, visible: bool) -> bool {
        let slot = match register {
            PointerRegister::A => &mut self.display_a,
            PointerRegister::B => &mut self.display_b,
            PointerRegister::C => &mut self.display_c,
            PointerRegister::D => &mut self.display_d,
            PointerRegister::Ssp | PointerRegister::Usp | PointerRegister::Ip => return false,
        };
        *slot = visible;
        true
    }

    /// Configuration with every marker shown.
    #[must_use]
    pub const fn all_markers() -> Self {
        Self {
            display_a: true,
            display_b: true,
            display_c: true,
            display_d: true,
            show_instructions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewConfig;
    use crate::PointerRegister;

    #[test]
    fn default_config_hides_optional_markers() {
        let config = ViewConfig::default();
        for register in PointerRegister::GENERAL {
            assert!(!config.displays(register));
        }
        assert!(!config.show_instructions);
        assert!(config.displays(PointerRegister::Ip));
        assert!(config.displays(PointerRegister::Ssp));
        assert!(config.displays(PointerRegister::Usp));
    }

    #[test]
    fn set_display_only_applies_to_general_registers() {
        let mut config = ViewConfig::default();
        assert!(config.set_display(PointerRegister::C, true));
        assert!(config.display_c);
        assert!(!config.set_display(PointerRegister::Ip, false));
        assert!(config.displays(PointerRegister::Ip));
    }
}
