//! Positional `%` substitution with the conversions plugin authors already
//! know from the server's format strings (`%s`, `%d`, `%1$s`, `%.2f`, ...).

use crate::error::FormatError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Arg {
    fn kind(&self) -> &'static str {
        match self {
            Arg::Str(_) => "string",
            Arg::Int(_) => "integer",
            Arg::Float(_) => "float",
            Arg::Bool(_) => "boolean",
            Arg::Char(_) => "character",
        }
    }
}

fn fmt_float(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let abs = value.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let s = value.to_string();
        if s.contains('.') {
            f.write_str(&s)
        } else {
            write!(f, "{}.0", s)
        }
    } else {
        let s = format!("{:e}", value);
        let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
        if mantissa.contains('.') {
            write!(f, "{}E{}", mantissa, exponent)
        } else {
            write!(f, "{}.0E{}", mantissa, exponent)
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.write_str(s),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Float(v) => fmt_float(*v, f),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Char(c) => write!(f, "{}", c),
        }
    }
}

macro_rules! impl_arg_from {
    ( $variant:ident: $( $type:ty ),* ) => {
        $(
            impl From<$type> for Arg {
                fn from(value: $type) -> Self {
                    Arg::$variant(value.into())
                }
            }
        )*
    }
}

impl_arg_from!(Str: String, &str, &String);
impl_arg_from!(Int: i8, i16, i32, i64, u8, u16, u32);
impl_arg_from!(Float: f32, f64);
impl_arg_from!(Bool: bool);
impl_arg_from!(Char: char);

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(Arg::Int)
            .unwrap_or_else(|_| Arg::Str(value.to_string()))
    }
}

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Arg::Int)
            .unwrap_or_else(|_| Arg::Str(value.to_string()))
    }
}

/// Builds a `Vec<Arg>` from mixed values: `args!["Bob", 3]`.
#[macro_export]
macro_rules! args {
    ( $( $value:expr ),* $(,)? ) => {
        vec![ $( $crate::format::Arg::from($value) ),* ]
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Index {
    Next,
    Explicit(usize),
    Previous,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Flags {
    left: bool,
    alternate: bool,
    plus: bool,
    space: bool,
    zero: bool,
    group: bool,
    paren: bool,
}

impl Flags {
    fn set(&mut self, flag: char) -> bool {
        match flag {
            '-' => self.left = true,
            '#' => self.alternate = true,
            '+' => self.plus = true,
            ' ' => self.space = true,
            '0' => self.zero = true,
            ',' => self.group = true,
            '(' => self.paren = true,
            _ => return false,
        }
        true
    }

    /// First flag set out of `allowed`, if any.
    fn first_outside(&self, allowed: &str) -> Option<char> {
        [
            (self.left, '-'),
            (self.alternate, '#'),
            (self.plus, '+'),
            (self.space, ' '),
            (self.zero, '0'),
            (self.group, ','),
            (self.paren, '('),
        ]
        .into_iter()
        .find(|&(set, flag)| set && !allowed.contains(flag))
        .map(|(_, flag)| flag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spec {
    index: Index,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

fn take_digits(input: &str) -> (Option<usize>, usize) {
    let len = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    (input[..len].parse().ok(), len)
}

impl Spec {
    /// Parses the text following a `%`. Returns the spec and the number of
    /// bytes consumed, or `None` if the text ends before a conversion.
    fn parse(input: &str) -> Option<(Spec, usize)> {
        let mut pos = 0;
        let mut index = Index::Next;

        let (digits, len) = take_digits(input);
        if len > 0 && input[len..].starts_with('$') {
            index = Index::Explicit(digits?);
            pos = len + 1;
        }

        let mut flags = Flags::default();
        for c in input[pos..].chars() {
            if c == '<' {
                index = Index::Previous;
            } else if !flags.set(c) {
                break;
            }
            pos += c.len_utf8();
        }

        let (width, len) = take_digits(&input[pos..]);
        pos += len;

        let mut precision = None;
        if input[pos..].starts_with('.') {
            let (digits, len) = take_digits(&input[pos + 1..]);
            precision = Some(digits?);
            pos += len + 1;
        }

        let conversion = input[pos..].chars().next()?;
        pos += conversion.len_utf8();

        Some((
            Spec {
                index,
                flags,
                width,
                precision,
                conversion,
            },
            pos,
        ))
    }

    fn illegal(&self, arg: &Arg) -> FormatError {
        FormatError::IllegalConversion {
            conversion: self.conversion,
            kind: arg.kind(),
        }
    }

    fn check_flags(&self, allowed: &str) -> Result<(), FormatError> {
        match self.flags.first_outside(allowed) {
            Some(flag) => Err(FormatError::IllegalFlag {
                flag,
                conversion: self.conversion,
            }),
            None => Ok(()),
        }
    }

    fn render(&self, arg: &Arg) -> Result<String, FormatError> {
        let upper = self.conversion.is_ascii_uppercase();
        let text = match self.conversion {
            's' | 'S' => {
                self.check_flags("-")?;
                self.truncate(arg.to_string())
            }
            'b' | 'B' => {
                self.check_flags("-")?;
                let value = match arg {
                    Arg::Bool(b) => *b,
                    _ => true,
                };
                self.truncate(value.to_string())
            }
            'c' | 'C' => {
                self.check_flags("-")?;
                let c = match arg {
                    Arg::Char(c) => *c,
                    Arg::Int(i) => u32::try_from(*i)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| self.illegal(arg))?,
                    _ => return Err(self.illegal(arg)),
                };
                c.to_string()
            }
            'd' => {
                self.check_flags("-+ 0,(")?;
                let Arg::Int(value) = arg else {
                    return Err(self.illegal(arg));
                };
                let mut digits = value.unsigned_abs().to_string();
                if self.flags.group {
                    digits = group_thousands(&digits);
                }
                return Ok(self.pad_number(*value < 0, String::new(), digits));
            }
            'o' | 'x' | 'X' => {
                self.check_flags("-#0")?;
                let Arg::Int(value) = arg else {
                    return Err(self.illegal(arg));
                };
                let bits = *value as u64;
                let (prefix, digits) = if self.conversion == 'o' {
                    ("0", format!("{:o}", bits))
                } else {
                    ("0x", format!("{:x}", bits))
                };
                let prefix = if self.flags.alternate { prefix } else { "" };
                let number = self.pad_number(false, prefix.to_string(), digits);
                return Ok(if upper { number.to_uppercase() } else { number });
            }
            'f' | 'e' | 'E' => {
                let Arg::Float(value) = arg else {
                    return Err(self.illegal(arg));
                };
                if self.conversion == 'f' {
                    self.check_flags("-+ 0,(")?;
                } else {
                    self.check_flags("-+ 0(")?;
                }
                if !value.is_finite() {
                    let text = if value.is_nan() {
                        "NaN".to_string()
                    } else if *value > 0.0 {
                        "Infinity".to_string()
                    } else {
                        "-Infinity".to_string()
                    };
                    return Ok(self.pad(text));
                }
                let precision = self.precision.unwrap_or(6);
                let abs = value.abs();
                let digits = if self.conversion == 'f' {
                    let digits = format!("{:.*}", precision, abs);
                    if self.flags.group {
                        match digits.split_once('.') {
                            Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
                            None => group_thousands(&digits),
                        }
                    } else {
                        digits
                    }
                } else {
                    scientific(abs, precision, upper)
                };
                return Ok(self.pad_number(value.is_sign_negative(), String::new(), digits));
            }
            conversion => return Err(FormatError::UnknownConversion { conversion }),
        };
        let text = if upper { text.to_uppercase() } else { text };
        Ok(self.pad(text))
    }

    fn truncate(&self, text: String) -> String {
        match self.precision {
            Some(precision) => text.chars().take(precision).collect(),
            None => text,
        }
    }

    fn pad(&self, text: String) -> String {
        let len = text.chars().count();
        match self.width {
            Some(width) if width > len => {
                let fill = " ".repeat(width - len);
                if self.flags.left {
                    text + &fill
                } else {
                    fill + &text
                }
            }
            _ => text,
        }
    }

    fn pad_number(&self, negative: bool, mut prefix: String, digits: String) -> String {
        let mut suffix = "";
        if negative {
            if self.flags.paren {
                prefix.insert(0, '(');
                suffix = ")";
            } else {
                prefix.insert(0, '-');
            }
        } else if self.flags.plus {
            prefix.insert(0, '+');
        } else if self.flags.space {
            prefix.insert(0, ' ');
        }

        let len = prefix.len() + digits.len() + suffix.len();
        match self.width {
            Some(width) if self.flags.zero && width > len => {
                format!("{}{}{}{}", prefix, "0".repeat(width - len), digits, suffix)
            }
            _ => self.pad(format!("{}{}{}", prefix, digits, suffix)),
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `1.500000e+03` style, with at least two exponent digits.
fn scientific(value: f64, precision: usize, upper: bool) -> String {
    let s = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let e = if upper { 'E' } else { 'e' };
    format!("{}{}{}{:02}", mantissa, e, sign, exponent.unsigned_abs())
}

/// Substitutes every format specifier in `template` with `args`.
pub fn format(template: &str, args: &[Arg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut next = 0;
    let mut last = None;
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some((spec, len)) = Spec::parse(after) else {
            return Err(FormatError::Incomplete {
                specifier: rest[start..].to_string(),
            });
        };
        let specifier = &rest[start..start + 1 + len];
        rest = &after[len..];

        match spec.conversion {
            '%' => {
                out.push_str(&spec.pad("%".to_string()));
                continue;
            }
            'n' => {
                out.push('\n');
                continue;
            }
            _ => {}
        }

        let missing = || FormatError::MissingArgument {
            specifier: specifier.to_string(),
        };
        let index = match spec.index {
            Index::Next => {
                next += 1;
                next - 1
            }
            Index::Explicit(i) => i.checked_sub(1).ok_or_else(missing)?,
            Index::Previous => last.ok_or_else(missing)?,
        };
        let arg = args.get(index).ok_or_else(missing)?;
        last = Some(index);
        out.push_str(&spec.render(arg)?);
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_in_order() {
        let args = args!["Bob", 3];
        assert_eq!(
            format("Hello %s, you have %d items", &args).unwrap(),
            "Hello Bob, you have 3 items"
        );
    }

    #[test]
    fn explicit_and_relative_indices() {
        let args = args!["a", "b"];
        assert_eq!(format("%2$s %1$s %<s %s", &args).unwrap(), "b a a a");
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(format("[%5s]", &args!["ab"]).unwrap(), "[   ab]");
        assert_eq!(format("[%-5s]", &args!["ab"]).unwrap(), "[ab   ]");
        assert_eq!(format("%05d", &args![-42]).unwrap(), "-0042");
        assert_eq!(format("%,d", &args![1234567]).unwrap(), "1,234,567");
        assert_eq!(format("%+d %(d", &args![5, -5]).unwrap(), "+5 (5)");
        assert_eq!(format("%#x %X %o", &args![255, 255, 8]).unwrap(), "0xff FF 10");
    }

    #[test]
    fn floats() {
        assert_eq!(format("%.2f", &args![3.14159]).unwrap(), "3.14");
        assert_eq!(format("%f", &args![1.5]).unwrap(), "1.500000");
        assert_eq!(format("%.3e", &args![1500.0]).unwrap(), "1.500e+03");
        assert_eq!(format("%s", &args![2.0]).unwrap(), "2.0");
    }

    #[test]
    fn literals() {
        assert_eq!(format("100%% done%n", &[]).unwrap(), "100% done\n");
        assert_eq!(format("%S %b %c", &args!["hi", 0, 'x']).unwrap(), "HI true x");
        assert_eq!(format("%.3s", &args!["abcdef"]).unwrap(), "abc");
    }

    #[test]
    fn errors() {
        assert_eq!(
            format("%s and %s", &args!["one"]),
            Err(FormatError::MissingArgument {
                specifier: "%s".to_string()
            })
        );
        assert_eq!(
            format("%d", &args!["x"]),
            Err(FormatError::IllegalConversion {
                conversion: 'd',
                kind: "string"
            })
        );
        assert_eq!(
            format("%q", &args![1]),
            Err(FormatError::UnknownConversion { conversion: 'q' })
        );
        assert_eq!(
            format("trailing %", &[]),
            Err(FormatError::Incomplete {
                specifier: "%".to_string()
            })
        );
        assert_eq!(
            format("%,s", &args!["x"]),
            Err(FormatError::IllegalFlag {
                flag: ',',
                conversion: 's'
            })
        );
    }
}
