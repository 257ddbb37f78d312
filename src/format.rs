//! Formatting (and parsing) with MySQL style `%` patterns.

use crate::common::{
    date_from_day_number, day_number, day_of_year, two_digit_year, week_to_day_number, weekday,
    WeekMode, POW10,
};
use crate::error::{Error, Result};
use crate::fields::Fields;
use crate::kind::{DateKind, DateType};
use crate::util::{invalid_at, write_u32, StrExt};
use crate::value::DateValue;
use chrono::Datelike;
use once_cell::sync::Lazy;
use stack_buf::StackVec;
use std::collections::HashMap;
use std::fmt;

const MAX_FIELDS: usize = 64;

/// Longest month or weekday name.
const MAX_NAME_LEN: usize = 9;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_ABBR_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Indexed by the Monday based weekday.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAY_ABBR_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Lower case name to `1`-based month or weekday (Monday is 1).
type NameDict = HashMap<String, u32>;

fn build_dict(names: &[&str]) -> NameDict {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_ascii_lowercase(), i as u32 + 1))
        .collect()
}

static MONTH_NAME_DICT: Lazy<NameDict> = Lazy::new(|| build_dict(&MONTH_NAMES));
static MONTH_ABBR_NAME_DICT: Lazy<NameDict> = Lazy::new(|| build_dict(&MONTH_ABBR_NAMES));
static WEEKDAY_NAME_DICT: Lazy<NameDict> = Lazy::new(|| build_dict(&WEEKDAY_NAMES));
static WEEKDAY_ABBR_NAME_DICT: Lazy<NameDict> = Lazy::new(|| build_dict(&WEEKDAY_ABBR_NAMES));

/// `%r`, i.e. `%I:%i:%S %p`.
const TIME12_FIELDS: [Field; 7] = [
    Field::Hour12,
    Field::Literal(':'),
    Field::Minute,
    Field::Literal(':'),
    Field::Second,
    Field::Blank(1),
    Field::AmPm,
];

/// `%T`, i.e. `%H:%i:%S`.
const TIME24_FIELDS: [Field; 5] = [
    Field::Hour24,
    Field::Literal(':'),
    Field::Minute,
    Field::Literal(':'),
    Field::Second,
];

/// Pattern of the date-only text form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pattern of the datetime text form.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%i:%s";

const DATE_FIELDS: [Field; 5] = [
    Field::Year4,
    Field::Literal('-'),
    Field::Month,
    Field::Literal('-'),
    Field::Day,
];

const DATETIME_FIELDS: [Field; 11] = [
    Field::Year4,
    Field::Literal('-'),
    Field::Month,
    Field::Literal('-'),
    Field::Day,
    Field::Blank(1),
    Field::Hour24,
    Field::Literal(':'),
    Field::Minute,
    Field::Literal(':'),
    Field::Second,
];

static DATE_FORMATTER: Lazy<Formatter> = Lazy::new(|| Formatter::from_fields(&DATE_FIELDS));
static DATETIME_FORMATTER: Lazy<Formatter> =
    Lazy::new(|| Formatter::from_fields(&DATETIME_FIELDS));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// ' '
    Blank(u8),
    /// Any character outside a directive.
    Literal(char),
    /// '%%'
    Percent,
    /// '%<x>' for a character without a meaning.
    Escaped(char),
    /// '%Y'
    Year4,
    /// '%y'
    Year2,
    /// '%m'
    Month,
    /// '%c'
    MonthNum,
    /// '%M'
    MonthName,
    /// '%b'
    MonthAbbr,
    /// '%d'
    Day,
    /// '%e'
    DayNum,
    /// '%D'
    DayWithSuffix,
    /// '%j'
    DayOfYear,
    /// '%H'
    Hour24,
    /// '%k'
    Hour24Num,
    /// '%h', '%I'
    Hour12,
    /// '%l'
    Hour12Num,
    /// '%i'
    Minute,
    /// '%s', '%S'
    Second,
    /// '%f'
    Fraction,
    /// '%p'
    AmPm,
    /// '%r'
    Time12,
    /// '%T'
    Time24,
    /// '%W'
    WeekdayName,
    /// '%a'
    WeekdayAbbr,
    /// '%w'
    WeekdayNum,
    /// '%U', '%u', '%V', '%v'
    Week(WeekMode),
    /// '%X', '%x'
    WeekYear { sunday_first: bool },
    /// '%.'
    SkipPunctuation,
    /// '%@'
    SkipAlphabetic,
    /// '%#'
    SkipDigits,
}

impl Field {
    #[inline]
    const fn from_directive(ch: char) -> Field {
        match ch {
            'Y' => Field::Year4,
            'y' => Field::Year2,
            'm' => Field::Month,
            'c' => Field::MonthNum,
            'M' => Field::MonthName,
            'b' => Field::MonthAbbr,
            'd' => Field::Day,
            'e' => Field::DayNum,
            'D' => Field::DayWithSuffix,
            'j' => Field::DayOfYear,
            'H' => Field::Hour24,
            'k' => Field::Hour24Num,
            'h' | 'I' => Field::Hour12,
            'l' => Field::Hour12Num,
            'i' => Field::Minute,
            's' | 'S' => Field::Second,
            'f' => Field::Fraction,
            'p' => Field::AmPm,
            'r' => Field::Time12,
            'T' => Field::Time24,
            'W' => Field::WeekdayName,
            'a' => Field::WeekdayAbbr,
            'w' => Field::WeekdayNum,
            'U' | 'u' | 'V' | 'v' => Field::Week(WeekMode {
                sunday_first: matches!(ch, 'U' | 'V'),
                strict: matches!(ch, 'V' | 'v'),
            }),
            'X' => Field::WeekYear { sunday_first: true },
            'x' => Field::WeekYear {
                sunday_first: false,
            },
            '.' => Field::SkipPunctuation,
            '@' => Field::SkipAlphabetic,
            '#' => Field::SkipDigits,
            '%' => Field::Percent,
            _ => Field::Escaped(ch),
        }
    }

    /// Whether the directive declares a time of day.
    #[inline]
    const fn is_time(&self) -> bool {
        matches!(
            self,
            Field::Hour24
                | Field::Hour24Num
                | Field::Hour12
                | Field::Hour12Num
                | Field::Minute
                | Field::Second
                | Field::Fraction
                | Field::AmPm
                | Field::Time12
                | Field::Time24
        )
    }

    /// The directive letter of directives that cannot be used for output.
    #[inline]
    const fn unsupported_output(&self) -> Option<char> {
        match self {
            Field::Fraction => Some('f'),
            Field::WeekdayNum => Some('w'),
            Field::DayWithSuffix => Some('D'),
            Field::Week(WeekMode {
                sunday_first: true,
                strict: false,
            }) => Some('U'),
            Field::Week(WeekMode {
                sunday_first: false,
                strict: false,
            }) => Some('u'),
            Field::Week(WeekMode {
                sunday_first: true,
                strict: true,
            }) => Some('V'),
            Field::WeekYear { sunday_first: true } => Some('X'),
            _ => None,
        }
    }
}

pub struct FormatParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FormatParser<'a> {
    #[inline]
    pub const fn new(input: &'a str) -> Self {
        FormatParser { input, pos: 0 }
    }

    #[inline]
    fn pop(&mut self) -> Option<char> {
        let ch = self.input[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    #[inline]
    fn blank_count(&self) -> usize {
        self.input.as_bytes()[self.pos..]
            .iter()
            .take(u8::MAX as usize - 1)
            .take_while(|&&ch| ch == b' ')
            .count()
    }

    fn next(&mut self) -> Option<Field> {
        let field = match self.pop()? {
            ' ' => {
                let len = self.blank_count();
                self.pos += len;
                Field::Blank(len as u8 + 1)
            }
            // a trailing '%' is an ordinary character
            '%' => match self.pop() {
                Some(directive) => Field::from_directive(directive),
                None => Field::Literal('%'),
            },
            ch => Field::Literal(ch),
        };
        Some(field)
    }
}

impl<'a> Iterator for FormatParser<'a> {
    type Item = Field;

    #[inline(always)]
    fn next(&mut self) -> Option<Field> {
        self.next()
    }
}

/// A compiled MySQL style date/time pattern.
#[derive(Debug)]
pub struct Formatter {
    fields: StackVec<Field, MAX_FIELDS>,
}

impl Formatter {
    /// Compiles a pattern for parsing. Every directive is accepted here; the
    /// ones the parser does not know fail when the parser reaches them.
    pub fn try_new<S: AsRef<str>>(fmt: S) -> Result<Self> {
        let parser = FormatParser::new(fmt.as_ref());

        let mut fields = StackVec::new();
        for field in parser {
            if fields.is_full() {
                return Err(Error::InvalidFormat(
                    "date format is too long for internal buffer".try_to_string()?,
                ));
            }
            fields.push(field);
        }

        Ok(Formatter { fields })
    }

    /// The shared compiled form of [`DATE_FORMAT`] or [`DATETIME_FORMAT`].
    #[inline]
    pub fn cached(fmt: &str) -> Option<&'static Formatter> {
        match fmt {
            DATE_FORMAT => Some(&*DATE_FORMATTER),
            DATETIME_FORMAT => Some(&*DATETIME_FORMATTER),
            _ => None,
        }
    }

    fn from_fields(list: &[Field]) -> Self {
        let mut fields = StackVec::new();
        for &field in list.iter().take(MAX_FIELDS) {
            fields.push(field);
        }
        Formatter { fields }
    }

    /// Compiles a pattern for output, rejecting directives that can only be parsed.
    pub fn try_new_for_output<S: AsRef<str>>(fmt: S) -> Result<Self> {
        let formatter = Formatter::try_new(fmt)?;
        for field in formatter.fields.iter() {
            if let Some(ch) = field.unsupported_output() {
                return Err(unsupported_directive(ch));
            }
        }
        Ok(formatter)
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether the pattern declares any time of day directive.
    #[inline]
    pub fn has_time_part(&self) -> bool {
        self.fields.iter().any(Field::is_time)
    }

    /// Formats a date literal.
    pub fn format<W: fmt::Write>(&self, value: &DateValue, mut w: W) -> Result<()> {
        let dt = value.fields();

        for field in self.fields.iter() {
            match *field {
                Field::Blank(n) => {
                    for _ in 0..n {
                        w.write_char(' ')?
                    }
                }
                Field::Literal(ch) | Field::Escaped(ch) => w.write_char(ch)?,
                Field::Percent => w.write_char('%')?,
                Field::SkipPunctuation => w.write_char('.')?,
                Field::SkipAlphabetic => w.write_char('@')?,
                Field::SkipDigits => w.write_char('#')?,
                Field::Year4 => write_u32(&mut w, dt.year, 4)?,
                Field::Year2 => write_u32(&mut w, dt.year % 100, 2)?,
                Field::Month => write_u32(&mut w, dt.month, 2)?,
                Field::MonthNum => write_u32(&mut w, dt.month, 1)?,
                Field::MonthName => w.write_str(month_name(&dt, &MONTH_NAMES)?)?,
                Field::MonthAbbr => w.write_str(month_name(&dt, &MONTH_ABBR_NAMES)?)?,
                Field::Day => write_u32(&mut w, dt.day, 2)?,
                Field::DayNum => write_u32(&mut w, dt.day, 1)?,
                Field::DayOfYear => {
                    check_calendar_date(&dt)?;
                    write_u32(&mut w, day_of_year(dt.year, dt.month, dt.day), 3)?
                }
                Field::Hour24 => write_u32(&mut w, dt.hour, 2)?,
                Field::Hour24Num => write_u32(&mut w, dt.hour, 1)?,
                Field::Hour12 => write_u32(&mut w, hour12(dt.hour), 2)?,
                Field::Hour12Num => write_u32(&mut w, hour12(dt.hour), 1)?,
                Field::Minute => write_u32(&mut w, dt.minute, 2)?,
                Field::Second => write_u32(&mut w, dt.second, 2)?,
                Field::AmPm => w.write_str(am_pm(dt.hour))?,
                Field::Time12 => {
                    write_u32(&mut w, hour12(dt.hour), 2)?;
                    w.write_char(':')?;
                    write_u32(&mut w, dt.minute, 2)?;
                    w.write_char(':')?;
                    write_u32(&mut w, dt.second, 2)?;
                    w.write_char(' ')?;
                    w.write_str(am_pm(dt.hour))?;
                }
                Field::Time24 => {
                    write_u32(&mut w, dt.hour, 2)?;
                    w.write_char(':')?;
                    write_u32(&mut w, dt.minute, 2)?;
                    w.write_char(':')?;
                    write_u32(&mut w, dt.second, 2)?;
                }
                Field::WeekdayName => w.write_str(weekday_name(&dt, &WEEKDAY_NAMES)?)?,
                Field::WeekdayAbbr => w.write_str(weekday_name(&dt, &WEEKDAY_ABBR_NAMES)?)?,
                Field::Week(WeekMode {
                    sunday_first: false,
                    strict: true,
                }) => {
                    let week = iso_week(&dt)?;
                    write_u32(&mut w, week.week(), 2)?
                }
                Field::WeekYear {
                    sunday_first: false,
                } => {
                    let week = iso_week(&dt)?;
                    write_u32(&mut w, week.year() as u32, 4)?
                }
                Field::Fraction
                | Field::WeekdayNum
                | Field::DayWithSuffix
                | Field::Week(_)
                | Field::WeekYear { .. } => {
                    if let Some(ch) = field.unsupported_output() {
                        return Err(unsupported_directive(ch));
                    }
                }
            }
        }

        Ok(())
    }

    /// Parses `input`, inferring `Date` or `DateTime` from the directives present.
    pub fn parse<S: AsRef<str>>(&self, input: S) -> Result<DateValue> {
        let input = input.as_ref();
        let mut state = ParseState::new();
        parse_fields(&self.fields, input.as_bytes(), &mut state)?;
        if !state.date_part_used && !state.time_part_used {
            return Err(invalid_at(
                input.as_bytes(),
                0,
                "no date or time directive was matched",
            ));
        }
        state.resolve(input.as_bytes())?;

        let fields = state.fields.validate(input)?;
        let kind = if state.time_part_used {
            DateKind::DateTime
        } else {
            DateKind::Date
        };
        Ok(DateValue::from_fields_unchecked(fields, DateType::new(kind)))
    }

    /// Parses `input` and converts the result to the requested type.
    #[inline]
    pub fn parse_with_type<S: AsRef<str>>(&self, input: S, ty: DateType) -> Result<DateValue> {
        self.parse(input)?.cast(ty)
    }
}

#[derive(Debug)]
struct ParseState {
    fields: Fields,
    date_part_used: bool,
    time_part_used: bool,
    month_set: bool,
    day_set: bool,
    /// Monday is 1, Sunday is 7.
    weekday: Option<u32>,
    year_day: Option<u32>,
    week: Option<(u32, WeekMode)>,
    /// Year of `%X`/`%x` and whether it was the Sunday based one.
    week_year: Option<(u32, bool)>,
}

impl ParseState {
    #[inline]
    const fn new() -> Self {
        ParseState {
            fields: Fields::new(),
            date_part_used: false,
            time_part_used: false,
            month_set: false,
            day_set: false,
            weekday: None,
            year_day: None,
            week: None,
            week_year: None,
        }
    }

    /// Turns day of year and week directives into a month and a day.
    fn resolve(&mut self, input: &[u8]) -> Result<()> {
        if let Some(year_day) = self.year_day.filter(|&d| d > 0) {
            let days = day_number(self.fields.year, 1, 1) + year_day as i64 - 1;
            self.set_date_from_day_number(days, input, "day of year")?;
        }

        if let (Some((week, mode)), Some(weekday_value)) = (self.week, self.weekday) {
            let days =
                week_to_day_number(self.fields.year, mode, self.week_year, week, weekday_value)?;
            self.set_date_from_day_number(days, input, "week number")?;
        }

        Ok(())
    }

    fn set_date_from_day_number(&mut self, days: i64, input: &[u8], what: &str) -> Result<()> {
        let (year, month, day) = date_from_day_number(days)?;
        if (self.month_set && month != self.fields.month) || (self.day_set && day != self.fields.day)
        {
            return Err(invalid(input, &[], &try_format!("{} conflicts with date", what)?));
        }
        self.fields.year = year;
        self.fields.month = month;
        self.fields.day = day;
        Ok(())
    }
}

/// Walks `fields` against `input`, returning the number of bytes consumed.
///
/// Input running out before the pattern ends is not an error; the remaining
/// directives only tell whether a time part was declared.
fn parse_fields(fields: &[Field], input: &[u8], state: &mut ParseState) -> Result<usize> {
    let mut s = input;
    let mut usa_time = false;
    let mut day_part = 0;
    let mut index = 0;

    macro_rules! expect_number {
        ($max_len: expr) => {{
            match eat_number(s, $max_len) {
                Some((n, len, rem)) => {
                    s = rem;
                    (n, len)
                }
                None => {
                    return Err(invalid(
                        input,
                        s,
                        "a non-numeric character was found where a numeric was expected",
                    ))
                }
            }
        }};
    }

    while index < fields.len() {
        s = eat_whitespaces(s);
        if s.is_empty() {
            break;
        }

        let field = fields[index];
        index += 1;

        match field {
            Field::Blank(_) => {}
            Field::Literal(ch) => {
                let mut buf = [0u8; 4];
                let expected = ch.encode_utf8(&mut buf).as_bytes();
                if !s.starts_with(expected) {
                    return Err(invalid(
                        input,
                        s,
                        &try_format!("invalid char, expected: {}", ch)?,
                    ));
                }
                s = &s[expected.len()..];
            }
            Field::Percent => {
                if s[0] != b'%' {
                    return Err(invalid(input, s, "invalid char after %"));
                }
                s = &s[1..];
            }
            Field::Escaped(ch) => {
                return Err(invalid(
                    input,
                    s,
                    &try_format!("invalid format pattern: %{}", ch)?,
                ));
            }
            Field::Year4 => {
                let (year, len) = expect_number!(4);
                state.fields.year = if len <= 2 { two_digit_year(year) } else { year };
                state.date_part_used = true;
            }
            Field::Year2 => {
                let (year, _) = expect_number!(2);
                state.fields.year = two_digit_year(year);
                state.date_part_used = true;
            }
            Field::Month | Field::MonthNum => {
                let (month, _) = expect_number!(2);
                state.fields.month = month;
                state.month_set = true;
                state.date_part_used = true;
            }
            Field::MonthName | Field::MonthAbbr => {
                let dict = if field == Field::MonthName {
                    &MONTH_NAME_DICT
                } else {
                    &MONTH_ABBR_NAME_DICT
                };
                let (month, rem) = lookup_word(dict, input, s)?;
                s = rem;
                state.fields.month = month;
                state.month_set = true;
                state.date_part_used = true;
            }
            Field::Day | Field::DayNum => {
                let (day, _) = expect_number!(2);
                state.fields.day = day;
                state.day_set = true;
                state.date_part_used = true;
            }
            Field::DayWithSuffix => {
                let (day, _) = expect_number!(2);
                let suffix = s
                    .iter()
                    .take(2)
                    .take_while(|ch| ch.is_ascii_alphabetic())
                    .count();
                s = &s[suffix..];
                state.fields.day = day;
                state.day_set = true;
                state.date_part_used = true;
            }
            Field::DayOfYear => {
                let (year_day, _) = expect_number!(3);
                state.year_day = Some(year_day);
                state.date_part_used = true;
            }
            Field::Hour24 | Field::Hour24Num | Field::Hour12 | Field::Hour12Num => {
                if matches!(field, Field::Hour12 | Field::Hour12Num) {
                    usa_time = true;
                }
                let (hour, _) = expect_number!(2);
                state.fields.hour = hour;
                state.time_part_used = true;
            }
            Field::Minute => {
                let (minute, _) = expect_number!(2);
                state.fields.minute = minute;
                state.time_part_used = true;
            }
            Field::Second => {
                let (second, _) = expect_number!(2);
                state.fields.second = second;
                state.time_part_used = true;
            }
            Field::Fraction => {
                let (fraction, len) = expect_number!(6);
                state.fields.microsecond = fraction * POW10[6 - len];
                state.time_part_used = true;
            }
            Field::AmPm => {
                if s.len() < 2 || !s[1].eq_ignore_ascii_case(&b'M') || !usa_time {
                    return Err(invalid(input, s, "invalid %p format"));
                }
                match s[0].to_ascii_uppercase() {
                    b'A' => {}
                    b'P' => day_part = 12,
                    _ => return Err(invalid(input, s, "invalid %p format")),
                }
                s = &s[2..];
                state.time_part_used = true;
            }
            Field::Time12 | Field::Time24 => {
                let sub_fields: &[Field] = if field == Field::Time12 {
                    &TIME12_FIELDS
                } else {
                    &TIME24_FIELDS
                };
                let consumed = parse_fields(sub_fields, s, state)?;
                s = &s[consumed..];
                state.time_part_used = true;
            }
            Field::WeekdayName | Field::WeekdayAbbr => {
                let dict = if field == Field::WeekdayName {
                    &WEEKDAY_NAME_DICT
                } else {
                    &WEEKDAY_ABBR_NAME_DICT
                };
                let (weekday_value, rem) = lookup_word(dict, input, s)?;
                s = rem;
                state.weekday = Some(weekday_value);
                state.date_part_used = true;
            }
            Field::WeekdayNum => {
                let (weekday_value, _) = expect_number!(1);
                if weekday_value >= 7 {
                    return Err(invalid(
                        input,
                        s,
                        &try_format!("invalid day of week: {}", weekday_value)?,
                    ));
                }
                // 0 is Sunday
                state.weekday = Some(if weekday_value == 0 { 7 } else { weekday_value });
                state.date_part_used = true;
            }
            Field::Week(mode) => {
                let (week, _) = expect_number!(2);
                if week > 53 || (mode.strict && week == 0) {
                    return Err(invalid(
                        input,
                        s,
                        &try_format!("invalid num of week: {}", week)?,
                    ));
                }
                state.week = Some((week, mode));
                state.date_part_used = true;
            }
            Field::WeekYear { sunday_first } => {
                let (year, _) = expect_number!(4);
                state.week_year = Some((year, sunday_first));
                state.date_part_used = true;
            }
            Field::SkipPunctuation => s = skip_while(s, u8::is_ascii_punctuation),
            Field::SkipAlphabetic => s = skip_while(s, u8::is_ascii_alphabetic),
            Field::SkipDigits => s = skip_while(s, u8::is_ascii_digit),
        }
    }

    if fields[index..].iter().any(Field::is_time) {
        state.time_part_used = true;
    }

    if usa_time {
        let hour = state.fields.hour;
        if !(1..=12).contains(&hour) {
            return Err(invalid(
                input,
                s,
                &try_format!("invalid hour: {}", hour)?,
            ));
        }
        state.fields.hour = hour % 12 + day_part;
    }

    Ok(input.len() - s.len())
}

#[inline]
fn invalid(input: &[u8], rest: &[u8], reason: &str) -> Error {
    invalid_at(input, input.len() - rest.len(), reason)
}

#[inline]
fn unsupported_directive(ch: char) -> Error {
    match try_format!("%{} not supported in date format string", ch) {
        Ok(msg) => Error::InvalidFormat(msg),
        Err(e) => e,
    }
}

/// Reads up to `max_len` digits, returning the value, the digit count and the rest.
#[inline]
fn eat_number(s: &[u8], max_len: usize) -> Option<(u32, usize, &[u8])> {
    let len = s
        .iter()
        .take(max_len)
        .take_while(|ch| ch.is_ascii_digit())
        .count();
    if len == 0 {
        return None;
    }
    let value = s[..len]
        .iter()
        .fold(0, |value, &ch| value * 10 + (ch - b'0') as u32);
    Some((value, len, &s[len..]))
}

#[inline]
fn eat_whitespaces(s: &[u8]) -> &[u8] {
    skip_while(s, u8::is_ascii_whitespace)
}

#[inline]
fn skip_while(s: &[u8], pred: fn(&u8) -> bool) -> &[u8] {
    let i = s.iter().take_while(|&ch| pred(ch)).count();
    &s[i..]
}

/// Looks up the run of letters at the head of `s` in a name dictionary, ignoring case.
fn lookup_word<'a>(dict: &NameDict, input: &[u8], s: &'a [u8]) -> Result<(u32, &'a [u8])> {
    let len = s.iter().take_while(|ch| ch.is_ascii_alphabetic()).count();
    if len > 0 && len <= MAX_NAME_LEN {
        let mut buf = [0u8; MAX_NAME_LEN];
        for (dst, src) in buf.iter_mut().zip(&s[..len]) {
            *dst = src.to_ascii_lowercase();
        }
        if let Some(&value) = std::str::from_utf8(&buf[..len])
            .ok()
            .and_then(|word| dict.get(word))
        {
            return Ok((value, &s[len..]));
        }
    }
    Err(invalid(
        input,
        s,
        &try_format!("'{}' is invalid", String::from_utf8_lossy(&s[..len]))?,
    ))
}

#[inline]
const fn hour12(hour: u32) -> u32 {
    match hour {
        0 => 12,
        1..=12 => hour,
        _ => hour - 12,
    }
}

#[inline]
const fn am_pm(hour: u32) -> &'static str {
    if hour < 12 {
        "AM"
    } else {
        "PM"
    }
}

#[inline]
fn check_calendar_date(dt: &Fields) -> Result<()> {
    if dt.month == 0 || dt.day == 0 {
        return Err(Error::InvalidFormat(try_format!(
            "invalid time format for date {:04}-{:02}-{:02}",
            dt.year,
            dt.month,
            dt.day
        )?));
    }
    Ok(())
}

#[inline]
fn month_name(dt: &Fields, names: &[&'static str; 12]) -> Result<&'static str> {
    check_calendar_date(dt)?;
    Ok(names[dt.month as usize - 1])
}

#[inline]
fn weekday_name(dt: &Fields, names: &[&'static str; 7]) -> Result<&'static str> {
    check_calendar_date(dt)?;
    let n = day_number(dt.year, dt.month, dt.day);
    Ok(names[weekday(n, false) as usize])
}

#[inline]
fn iso_week(dt: &Fields) -> Result<chrono::IsoWeek> {
    check_calendar_date(dt)?;
    match dt.to_naive() {
        Some(naive) => Ok(naive.iso_week()),
        None => Err(Error::InvalidFormat("invalid date for week".try_to_string()?)),
    }
}
