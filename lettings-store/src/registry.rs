use crate::{meta::ModelMeta, Error};

/// Submitted once per `#[derive(Model)]` type.
pub struct ModelRegistration {
    pub meta: fn() -> &'static ModelMeta,
}

inventory::collect!(ModelRegistration);

/// Every registered model, sorted by table name.
pub fn models() -> Vec<&'static ModelMeta> {
    let mut models: Vec<_> = inventory::iter::<ModelRegistration>
        .into_iter()
        .map(|registration| (registration.meta)())
        .collect();
    models.sort_by_key(|meta| meta.table);
    models
}

pub fn find(table: &str) -> Option<&'static ModelMeta> {
    inventory::iter::<ModelRegistration>
        .into_iter()
        .map(|registration| (registration.meta)())
        .find(|meta| meta.table == table)
}

/// Registered models ordered so that referenced tables come first.
pub fn migration_order() -> Result<Vec<&'static ModelMeta>, Error> {
    order_by_dependencies(models())
}

fn order_by_dependencies(models: Vec<&'static ModelMeta>) -> Result<Vec<&'static ModelMeta>, Error> {
    for meta in &models {
        if let Some(missing) = meta
            .depends_on()
            .into_iter()
            .find(|table| !models.iter().any(|other| other.table == *table))
        {
            return Err(Error::Migration(format!(
                "`{}` references unregistered table `{missing}`",
                meta.table
            )));
        }
    }

    let mut ordered: Vec<&'static ModelMeta> = Vec::with_capacity(models.len());
    let mut pending = models;
    while !pending.is_empty() {
        let (ready, blocked): (Vec<_>, Vec<_>) = pending.into_iter().partition(|meta| {
            meta.depends_on()
                .iter()
                .all(|table| ordered.iter().any(|done| done.table == *table))
        });
        if ready.is_empty() {
            let tables: Vec<_> = blocked.iter().map(|meta| meta.table).collect();
            return Err(Error::Migration(format!(
                "foreign key cycle between {}",
                tables.join(", ")
            )));
        }
        ordered.extend(ready);
        pending = blocked;
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{FieldKind, FieldMeta, ForeignKey};

    const fn column(name: &'static str, foreign_key: Option<ForeignKey>) -> FieldMeta {
        FieldMeta {
            name,
            kind: FieldKind::Integer,
            primary_key: false,
            auto: false,
            nullable: false,
            unique: false,
            blank: false,
            editable: true,
            has_default: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            foreign_key,
        }
    }

    const fn references(table: &'static str) -> Option<ForeignKey> {
        Some(ForeignKey { table, column: "id" })
    }

    static PARENT: ModelMeta = ModelMeta {
        name: "Parent",
        table: "parent",
        pk: "id",
        display: None,
        fields: &[column("id", None)],
        up: "",
        down: "",
    };

    static CHILD: ModelMeta = ModelMeta {
        name: "Child",
        table: "child",
        pk: "id",
        display: None,
        fields: &[column("parent", references("parent"))],
        up: "",
        down: "",
    };

    static LOOP_A: ModelMeta = ModelMeta {
        name: "LoopA",
        table: "loop_a",
        pk: "id",
        display: None,
        fields: &[column("b", references("loop_b"))],
        up: "",
        down: "",
    };

    static LOOP_B: ModelMeta = ModelMeta {
        name: "LoopB",
        table: "loop_b",
        pk: "id",
        display: None,
        fields: &[column("a", references("loop_a"))],
        up: "",
        down: "",
    };

    #[test]
    fn referenced_tables_come_first() {
        let ordered = order_by_dependencies(vec![&CHILD, &PARENT]).unwrap();
        let tables: Vec<_> = ordered.iter().map(|meta| meta.table).collect();
        assert_eq!(tables, ["parent", "child"]);
    }

    #[test]
    fn cycles_are_rejected() {
        let err = order_by_dependencies(vec![&LOOP_A, &LOOP_B]).unwrap_err();
        assert!(matches!(err, Error::Migration(message) if message.contains("cycle")));
    }

    #[test]
    fn unknown_references_are_rejected() {
        let err = order_by_dependencies(vec![&CHILD]).unwrap_err();
        assert!(matches!(err, Error::Migration(message) if message.contains("unregistered")));
    }
}
