use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Error};

use crate::backend::locate_chars;

/// Registers `locate(pattern, text, start)`, the three-argument locate that
/// SQLite does not ship. Text arguments that are integers or reals are
/// compared by their decimal text, the way `instr` coerces them.
pub(super) fn register_locate(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "locate",
        3,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let Some(pattern) = text_arg(ctx, 0)? else {
                return Ok(None);
            };
            let Some(text) = text_arg(ctx, 1)? else {
                return Ok(None);
            };
            let Some(start) = ctx.get::<Option<i64>>(2)? else {
                return Ok(None);
            };
            Ok(Some(locate_chars(&text, &pattern, start)))
        },
    )
}

fn text_arg(ctx: &Context<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    match ctx.get_raw(idx) {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(value.to_string())),
        ValueRef::Real(value) => Ok(Some(value.to_string())),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| Some(text.to_string()))
            .map_err(|err| Error::UserFunctionError(Box::new(err))),
        ValueRef::Blob(_) => Err(Error::UserFunctionError(
            format!("locate argument {idx} must be text, got a blob").into(),
        )),
    }
}
