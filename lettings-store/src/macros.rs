/// Builds a `Vec<Kwargs>` of query conditions.
///
/// Supported forms:
///
/// ```ignore
/// kwargs!(name = "joe", age = 19);               // equality, joined with `and`
/// kwargs!(age >= 18);                            // any comparison operator
/// kwargs!(auth_user.id == profiles_profile.user); // column against column
/// kwargs!(auth_user.username == "alice");        // qualified column against value
/// ```
#[macro_export]
macro_rules! kwargs {
    ($($field:ident = $value:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut args: Vec<$crate::db::query::condition::Kwargs> = Vec::new();
            $(
                if !args.is_empty() {
                    args.push($crate::db::query::condition::Kwargs::LogicalOperator {
                        operator: "and".to_string(),
                    });
                }
                args.push($crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::value::Value::from($value.clone()),
                    comparison_operator: "=".to_string(),
                });
            )*
            args
        }
    };

    ($table:ident.$column:ident $op:tt $v_table:ident.$v_column:ident) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Column {
                    field: format!("{}.{}", stringify!($table), stringify!($column)),
                    other: format!("{}.{}", stringify!($v_table), stringify!($v_column)),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };

    ($table:ident.$column:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: format!("{}.{}", stringify!($table), stringify!($column)),
                    value: $crate::value::Value::from($value.clone()),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };

    ($field:ident $op:tt $value:expr) => {
        {
            vec![
                $crate::db::query::condition::Kwargs::Condition {
                    field: stringify!($field).to_string(),
                    value: $crate::value::Value::from($value.clone()),
                    comparison_operator: stringify!($op).to_string(),
                }
            ]
        }
    };
}

/// Binds a list of [`Value`](crate::value::Value)s to a sqlx query.
macro_rules! binds {
    ($args:expr, $stream:expr) => {{
        for arg in $args {
            $stream = match arg {
                $crate::value::Value::Null => $stream.bind(Option::<String>::None),
                $crate::value::Value::Integer(value) => $stream.bind(value),
                $crate::value::Value::Float(value) => $stream.bind(value),
                $crate::value::Value::Text(value) => $stream.bind(value),
            };
        }
    }};
}

/// Starts a `SELECT table.*` statement over the first model's table.
///
/// ```ignore
/// let users: Vec<User> = select!(User)
///     .inner_join::<Profile>(kwargs!(auth_user.id == profiles_profile.user))
///     .fetch_all(&conn)
///     .await?;
/// ```
#[macro_export]
macro_rules! select {
    ($table:ty) => {
        $crate::db::query::statement::Statement::select(
            <$table as $crate::db::model::Model>::meta(),
        )
    };
}
