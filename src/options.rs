use crate::{MatrixError, Result};

/// The structured options record handed to the native matrix factory.
///
/// Defaults match the native library's defaults. Every setter returns `&mut Self`, so options
/// can be built in place:
///
/// ```
/// let mut options = rgbmatrix::MatrixOptions::default();
/// options
///     .set_hardware_mapping("adafruit-hat")
///     .set_rows(16)
///     .set_cols(32)
///     .set_chain_length(3)
///     .set_brightness(35)
///     .set_gpio_slowdown(3);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MatrixOptions {
    /// Name of the GPIO mapping, e.g. "regular", "adafruit-hat", "adafruit-hat-pwm"
    pub hardware_mapping: String,
    /// Rows of a single panel
    pub rows: u32,
    /// Columns of a single panel
    pub cols: u32,
    /// Number of panels daisy-chained together
    pub chain_length: u32,
    /// Number of chains driven in parallel
    pub parallel: u32,
    pub pwm_bits: u32,
    pub pwm_lsb_nanoseconds: u32,
    pub pwm_dither_bits: u32,
    /// Percentage, 1..=100
    pub brightness: u8,
    /// 0 = progressive, 1 = interlaced
    pub scan_mode: u32,
    pub row_address_type: u32,
    pub multiplexing: u32,
    /// Any permutation of "RGB"
    pub led_rgb_sequence: String,
    /// Semicolon-separated list of pixel mappers, e.g. "Rotate:90;Mirror:H"
    pub pixel_mapper_config: String,
    /// Chip-specific initialization, e.g. "FM6126A". Empty for none
    pub panel_type: String,
    pub disable_hardware_pulsing: bool,
    pub show_refresh_rate: bool,
    pub inverse_colors: bool,
    /// 0 means no limit
    pub limit_refresh_rate_hz: u32,
    /// Slow down GPIO writes for faster Raspberry Pis. Not part of the native options struct;
    /// passed as a `--led-slowdown-gpio` flag instead
    pub gpio_slowdown: u32,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            hardware_mapping: "regular".to_owned(),
            rows: 32,
            cols: 32,
            chain_length: 1,
            parallel: 1,
            pwm_bits: 11,
            pwm_lsb_nanoseconds: 130,
            pwm_dither_bits: 0,
            brightness: 100,
            scan_mode: 0,
            row_address_type: 0,
            multiplexing: 0,
            led_rgb_sequence: "RGB".to_owned(),
            pixel_mapper_config: String::new(),
            panel_type: String::new(),
            disable_hardware_pulsing: false,
            show_refresh_rate: false,
            inverse_colors: false,
            limit_refresh_rate_hz: 0,
            gpio_slowdown: 1,
        }
    }
}

macro_rules! setters {
    ( $( $setter:ident($field:ident: $ty:ty) ),* $(,)? ) => {
        $(
            pub fn $setter(&mut self, $field: $ty) -> &mut Self {
                self.$field = $field;
                self
            }
        )*
    };
}

impl MatrixOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a chain of `chain_length` panels of `rows` rows, `parallel` chains wide. This
    /// is what the explicit-geometry constructor of [`crate::Matrix`] asks the driver for
    pub fn with_geometry(rows: u32, chain_length: u32, parallel: u32) -> Self {
        Self {
            rows,
            chain_length,
            parallel,
            ..Self::default()
        }
    }

    setters!(
        set_rows(rows: u32),
        set_cols(cols: u32),
        set_chain_length(chain_length: u32),
        set_parallel(parallel: u32),
        set_pwm_bits(pwm_bits: u32),
        set_pwm_lsb_nanoseconds(pwm_lsb_nanoseconds: u32),
        set_pwm_dither_bits(pwm_dither_bits: u32),
        set_brightness(brightness: u8),
        set_scan_mode(scan_mode: u32),
        set_row_address_type(row_address_type: u32),
        set_multiplexing(multiplexing: u32),
        set_disable_hardware_pulsing(disable_hardware_pulsing: bool),
        set_show_refresh_rate(show_refresh_rate: bool),
        set_inverse_colors(inverse_colors: bool),
        set_limit_refresh_rate_hz(limit_refresh_rate_hz: u32),
        set_gpio_slowdown(gpio_slowdown: u32),
    );

    pub fn set_hardware_mapping(&mut self, hardware_mapping: impl Into<String>) -> &mut Self {
        self.hardware_mapping = hardware_mapping.into();
        self
    }

    pub fn set_led_rgb_sequence(&mut self, led_rgb_sequence: impl Into<String>) -> &mut Self {
        self.led_rgb_sequence = led_rgb_sequence.into();
        self
    }

    pub fn set_pixel_mapper_config(&mut self, pixel_mapper_config: impl Into<String>) -> &mut Self {
        self.pixel_mapper_config = pixel_mapper_config.into();
        self
    }

    pub fn set_panel_type(&mut self, panel_type: impl Into<String>) -> &mut Self {
        self.panel_type = panel_type.into();
        self
    }

    /// Check the options against the ranges the native driver accepts.
    ///
    /// The native library performs the same checks itself and answers with a null handle; this
    /// exists to get a readable reason ahead of time.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(MatrixError::InvalidOptions(msg()))
            }
        }

        check(
            (4..=64).contains(&self.rows) && self.rows % 2 == 0,
            || format!("rows must be an even number in 4..=64, got {}", self.rows),
        )?;
        check(self.cols >= 1, || "cols must be at least 1".to_owned())?;
        check(self.chain_length >= 1, || {
            "chain length must be at least 1".to_owned()
        })?;
        check((1..=6).contains(&self.parallel), || {
            format!("parallel must be in 1..=6, got {}", self.parallel)
        })?;
        check((1..=11).contains(&self.pwm_bits), || {
            format!("pwm bits must be in 1..=11, got {}", self.pwm_bits)
        })?;
        check(self.pwm_dither_bits <= 2, || {
            format!("pwm dither bits must be in 0..=2, got {}", self.pwm_dither_bits)
        })?;
        check((1..=100).contains(&self.brightness), || {
            format!("brightness must be in 1..=100, got {}", self.brightness)
        })?;
        check(self.scan_mode <= 1, || {
            format!("scan mode must be 0 or 1, got {}", self.scan_mode)
        })?;
        check(self.row_address_type <= 5, || {
            format!("row address type must be in 0..=5, got {}", self.row_address_type)
        })?;
        check(self.gpio_slowdown <= 5, || {
            format!("gpio slowdown must be in 0..=5, got {}", self.gpio_slowdown)
        })?;

        let mut sequence: Vec<char> = self.led_rgb_sequence.to_ascii_uppercase().chars().collect();
        sequence.sort_unstable();
        check(sequence == ['B', 'G', 'R'], || {
            format!("led rgb sequence must be a permutation of RGB, got {:?}", self.led_rgb_sequence)
        })?;

        Ok(())
    }

    /// Parse options from a TOML document. Missing keys keep their defaults
    ///
    /// ```
    /// let options = rgbmatrix::MatrixOptions::from_toml_str(r#"
    ///     hardware_mapping = "adafruit-hat"
    ///     rows = 16
    ///     chain_length = 3
    /// "#)?;
    /// assert_eq!(options.rows, 16);
    /// assert_eq!(options.cols, 32);
    /// # Ok::<(), rgbmatrix::MatrixError>(())
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Read and parse a TOML file, see [`Self::from_toml_str`]
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml_str = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&toml_str)?;
        log::debug!("Loaded matrix options from {}", path.display());
        Ok(options)
    }
}
