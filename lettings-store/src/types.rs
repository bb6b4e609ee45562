//! The derive macro maps these aliases to column types, so model fields
//! should be declared with them rather than the underlying Rust types.

/// `integer`; with `auto = true` on a primary key, an auto-increment id.
pub type Integer = i32;
/// Unbounded `text`.
pub type Text = String;
pub type Float = f64;
/// `varchar(10)`, `YYYY-MM-DD`.
pub type Date = String;
/// `varchar(40)`, `YYYY-MM-DD HH:MM:SS`.
pub type DateTime = String;
/// Stored as an integer; compare against [`True`] and [`False`].
pub type Boolean = i32;

#[allow(non_upper_case_globals)]
pub const True: Boolean = 1;
#[allow(non_upper_case_globals)]
pub const False: Boolean = 0;
