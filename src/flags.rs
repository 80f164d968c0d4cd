//! The `--led-*` command-line flags understood by the native driver.
//!
//! The native factory accepts an `argv` and lets recognized flags override the options record.
//! This module renders [`MatrixOptions`] as such flags and parses them back, so that the
//! software driver honors the same override path.

use std::ffi::CString;

use crate::{MatrixError, MatrixOptions, Result};

/// Program name passed as `argv[0]`; the native flag parser skips it
const PROGRAM_NAME: &str = "rgbmatrix";

/// Flags the native driver treats as runtime options. They're accepted, but have no effect on
/// [`MatrixOptions`]
const RUNTIME_SWITCHES: &[&str] = &["--led-daemon", "--led-no-daemon", "--led-no-drop-privs"];
const RUNTIME_VALUES: &[&str] = &["--led-drop-priv-user", "--led-drop-priv-group"];

enum Value {
    Number(fn(&mut MatrixOptions, u32)),
    Text(fn(&mut MatrixOptions, String)),
    Switch(fn(&mut MatrixOptions)),
}

fn lookup(flag: &str) -> Option<Value> {
    use Value::*;

    Some(match flag {
        "--led-gpio-mapping" => Text(|o, v| o.hardware_mapping = v),
        "--led-rows" => Number(|o, v| o.rows = v),
        "--led-cols" => Number(|o, v| o.cols = v),
        "--led-chain" => Number(|o, v| o.chain_length = v),
        "--led-parallel" => Number(|o, v| o.parallel = v),
        "--led-multiplexing" => Number(|o, v| o.multiplexing = v),
        "--led-pixel-mapper" => Text(|o, v| o.pixel_mapper_config = v),
        "--led-pwm-bits" => Number(|o, v| o.pwm_bits = v),
        "--led-brightness" => Number(|o, v| o.brightness = v.min(u8::MAX as u32) as u8),
        "--led-scan-mode" => Number(|o, v| o.scan_mode = v),
        "--led-row-addr-type" => Number(|o, v| o.row_address_type = v),
        "--led-limit-refresh" => Number(|o, v| o.limit_refresh_rate_hz = v),
        "--led-rgb-sequence" => Text(|o, v| o.led_rgb_sequence = v),
        "--led-pwm-lsb-nanoseconds" => Number(|o, v| o.pwm_lsb_nanoseconds = v),
        "--led-pwm-dither-bits" => Number(|o, v| o.pwm_dither_bits = v),
        "--led-panel-type" => Text(|o, v| o.panel_type = v),
        "--led-slowdown-gpio" => Number(|o, v| o.gpio_slowdown = v),
        "--led-show-refresh" => Switch(|o| o.show_refresh_rate = true),
        "--led-no-show-refresh" => Switch(|o| o.show_refresh_rate = false),
        "--led-inverse" => Switch(|o| o.inverse_colors = true),
        "--led-no-inverse" => Switch(|o| o.inverse_colors = false),
        "--led-hardware-pulse" => Switch(|o| o.disable_hardware_pulsing = false),
        "--led-no-hardware-pulse" => Switch(|o| o.disable_hardware_pulsing = true),
        _ => return None,
    })
}

impl MatrixOptions {
    /// Render every option as a `--led-*` flag
    ///
    /// ```
    /// let mut options = rgbmatrix::MatrixOptions::default();
    /// options.set_rows(16).set_inverse_colors(true);
    /// let flags = options.to_flags();
    /// assert!(flags.contains(&"--led-rows=16".to_owned()));
    /// assert!(flags.contains(&"--led-inverse".to_owned()));
    /// ```
    pub fn to_flags(&self) -> Vec<String> {
        let mut flags = vec![
            format!("--led-gpio-mapping={}", self.hardware_mapping),
            format!("--led-rows={}", self.rows),
            format!("--led-cols={}", self.cols),
            format!("--led-chain={}", self.chain_length),
            format!("--led-parallel={}", self.parallel),
            format!("--led-multiplexing={}", self.multiplexing),
            format!("--led-pwm-bits={}", self.pwm_bits),
            format!("--led-brightness={}", self.brightness),
            format!("--led-scan-mode={}", self.scan_mode),
            format!("--led-row-addr-type={}", self.row_address_type),
            format!("--led-limit-refresh={}", self.limit_refresh_rate_hz),
            format!("--led-rgb-sequence={}", self.led_rgb_sequence),
            format!("--led-pwm-lsb-nanoseconds={}", self.pwm_lsb_nanoseconds),
            format!("--led-pwm-dither-bits={}", self.pwm_dither_bits),
            format!("--led-slowdown-gpio={}", self.gpio_slowdown),
        ];
        // the native parser rejects empty values
        if !self.pixel_mapper_config.is_empty() {
            flags.push(format!("--led-pixel-mapper={}", self.pixel_mapper_config));
        }
        if !self.panel_type.is_empty() {
            flags.push(format!("--led-panel-type={}", self.panel_type));
        }
        if self.show_refresh_rate {
            flags.push("--led-show-refresh".to_owned());
        }
        if self.inverse_colors {
            flags.push("--led-inverse".to_owned());
        }
        if self.disable_hardware_pulsing {
            flags.push("--led-no-hardware-pulse".to_owned());
        }
        flags
    }

    /// Apply the `--led-*` flags found in `args`, in order, so later flags win. Both
    /// `--led-rows=16` and `--led-rows 16` are accepted.
    ///
    /// Returns the arguments that weren't consumed, in their original order.
    ///
    /// ```
    /// let mut options = rgbmatrix::MatrixOptions::default();
    /// let rest = options.apply_flags(["demo", "--led-chain", "4", "--speed=2", "--led-inverse"])?;
    /// assert_eq!(options.chain_length, 4);
    /// assert!(options.inverse_colors);
    /// assert_eq!(rest, vec!["demo".to_owned(), "--speed=2".to_owned()]);
    /// # Ok::<(), rgbmatrix::MatrixError>(())
    /// ```
    pub fn apply_flags<I, S>(&mut self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rest = Vec::new();
        let mut args = args.into_iter().map(|arg| arg.as_ref().to_owned());

        while let Some(arg) = args.next() {
            let (flag, inline_value) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_owned(), Some(value.to_owned())),
                None => (arg.clone(), None),
            };

            if RUNTIME_SWITCHES.contains(&flag.as_str()) {
                log::debug!("Ignoring runtime flag {}", flag);
                continue;
            }
            if RUNTIME_VALUES.contains(&flag.as_str()) {
                if inline_value.is_none() {
                    args.next();
                }
                log::debug!("Ignoring runtime flag {}", flag);
                continue;
            }

            let setter = match lookup(&flag) {
                Some(setter) => setter,
                None => {
                    rest.push(arg);
                    continue;
                }
            };

            let mut value = || {
                inline_value
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| MatrixError::InvalidOptions(format!("{} expects a value", flag)))
            };

            match setter {
                Value::Number(set) => {
                    let value = value()?;
                    let number = value.parse().map_err(|_| {
                        MatrixError::InvalidOptions(format!(
                            "{} expects a number, got {:?}",
                            flag, value
                        ))
                    })?;
                    set(self, number);
                }
                Value::Text(set) => set(self, value()?),
                Value::Switch(set) => {
                    if inline_value.is_some() {
                        return Err(MatrixError::InvalidOptions(format!(
                            "{} doesn't take a value",
                            flag
                        )));
                    }
                    set(self);
                }
            }
        }

        Ok(rest)
    }
}

/// The `argv` handed to the native factory: the program name, then GPIO slowdown (a runtime
/// option without a struct field), then `args`, so that the caller's flags win. Arguments with a
/// NUL byte can't be passed to C and are dropped.
#[cfg_attr(not(feature = "native"), allow(dead_code))]
pub(crate) fn native_argv(options: &MatrixOptions, args: &[String]) -> Vec<CString> {
    std::iter::once(PROGRAM_NAME.to_owned())
        .chain(std::iter::once(format!("--led-slowdown-gpio={}", options.gpio_slowdown)))
        .chain(args.iter().cloned())
        .filter_map(|arg| match CString::new(arg) {
            Ok(arg) => Some(arg),
            Err(e) => {
                log::warn!("Dropping command-line argument with NUL byte: {}", e);
                None
            }
        })
        .collect()
}
