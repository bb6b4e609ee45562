use sqlx::{any::AnyRow, FromRow};

use super::{builder, condition::Kwargs};
use crate::{db::Connection, meta::ModelMeta, Error};

pub enum JoinType {
    Inner,
    Left,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join_type_name = match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
        };
        f.write_str(join_type_name)
    }
}

/// A `select table.* from table ...` statement, built with [`select!`].
pub struct Statement {
    base: &'static ModelMeta,
    joins: Vec<(JoinType, &'static str, Vec<Kwargs>)>,
    conditions: Vec<Kwargs>,
    order_by: Vec<String>,
}

impl Statement {
    pub fn select(base: &'static ModelMeta) -> Self {
        Self {
            base,
            joins: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn inner_join<T: crate::db::model::Model>(self, on: Vec<Kwargs>) -> Self {
        self.join(JoinType::Inner, T::meta().table, on)
    }

    pub fn left_join<T: crate::db::model::Model>(self, on: Vec<Kwargs>) -> Self {
        self.join(JoinType::Left, T::meta().table, on)
    }

    pub fn join(mut self, join_type: JoinType, table: &'static str, on: Vec<Kwargs>) -> Self {
        self.joins.push((join_type, table, on));
        self
    }

    pub fn r#where(mut self, kw: Vec<Kwargs>) -> Self {
        self.conditions = kw;
        self
    }

    /// Adds a sort key; prefix with `-` for descending order.
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(match column.strip_prefix('-') {
            Some(column) => format!("{column} desc"),
            None => format!("{column} asc"),
        });
        self
    }

    fn to_sql(&self) -> (String, Vec<crate::value::Value>) {
        let mut sql = format!("select {table}.* from {table}", table = self.base.table);
        let mut args = Vec::new();
        for (join_type, table, on) in &self.joins {
            let on = builder::to_select_query(on, args.len());
            sql.push_str(&format!(" {join_type} join {table} on {}", on.placeholders));
            args.extend(on.args);
        }
        if !self.conditions.is_empty() {
            let filter = builder::to_select_query(&self.conditions, args.len());
            sql.push_str(&format!(" where {}", filter.placeholders));
            args.extend(filter.args);
        }
        if self.order_by.is_empty() {
            sql.push_str(&format!(" order by {}.{} asc", self.base.table, self.base.pk));
        } else {
            sql.push_str(&format!(" order by {}", self.order_by.join(", ")));
        }
        (sql, args)
    }

    pub async fn fetch_all<T>(&self, conn: &Connection) -> Result<Vec<T>, Error>
    where
        T: Send + Unpin + for<'r> FromRow<'r, AnyRow>,
    {
        let (sql, args) = self.to_sql();
        tracing::trace!(%sql, "select");
        let mut stream = sqlx::query_as::<_, T>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_all(conn).await?)
    }

    pub async fn fetch_optional<T>(&self, conn: &Connection) -> Result<Option<T>, Error>
    where
        T: Send + Unpin + for<'r> FromRow<'r, AnyRow>,
    {
        let (sql, args) = self.to_sql();
        let sql = format!("{sql} limit 1");
        tracing::trace!(%sql, "select");
        let mut stream = sqlx::query_as::<_, T>(&sql);
        binds!(args, stream);
        Ok(stream.fetch_optional(conn).await?)
    }

    pub async fn fetch_one<T>(&self, conn: &Connection) -> Result<T, Error>
    where
        T: Send + Unpin + for<'r> FromRow<'r, AnyRow>,
    {
        self.fetch_optional(conn)
            .await?
            .ok_or(Error::Database(sqlx::Error::RowNotFound))
    }
}

#[cfg(all(test, not(feature = "postgres")))]
mod tests {
    use super::*;
    use crate::meta::{FieldKind, FieldMeta};

    static USERS: ModelMeta = ModelMeta {
        name: "User",
        table: "auth_user",
        pk: "id",
        display: None,
        fields: &[FieldMeta {
            name: "id",
            kind: FieldKind::Integer,
            primary_key: true,
            auto: true,
            nullable: true,
            unique: false,
            blank: false,
            editable: false,
            has_default: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            foreign_key: None,
        }],
        up: "",
        down: "",
    };

    #[test]
    fn joins_filters_and_default_order() {
        let (sql, args) = Statement::select(&USERS)
            .join(
                JoinType::Inner,
                "profiles_profile",
                kwargs!(auth_user.id == profiles_profile.user),
            )
            .r#where(kwargs!(profiles_profile.favorite_city == "London"))
            .to_sql();
        assert_eq!(
            sql,
            "select auth_user.* from auth_user inner join profiles_profile on \
             auth_user.id=profiles_profile.user where profiles_profile.favorite_city=?1 \
             order by auth_user.id asc"
        );
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn explicit_order() {
        let (sql, _) = Statement::select(&USERS).order_by("-username").to_sql();
        assert_eq!(sql, "select auth_user.* from auth_user order by username desc");
    }
}
