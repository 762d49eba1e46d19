#[cfg(test)]
mod tests {
    use crate::{
        Builder, ColumnValues, DeleteQuery, SqlValue, TypedDeleteQuery, TypedUpdateQuery,
        UpdateQuery, and, equal, less_than,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn update_sets_in_order() {
        let mut q = UpdateQuery::new();
        q.table("users")
            .set("name", "Jim")
            .set("age", 30)
            .set("name", "Tom")
            .where_(equal("id", 1));

        assert_eq!(
            q.render(),
            (
                "UPDATE users SET name = ?, age = ? WHERE id = ?".to_string(),
                vec![SqlValue::from("Tom"), SqlValue::I64(30), SqlValue::I64(1)]
            )
        );
    }

    #[test]
    fn update_with_empty_condition_omits_where() {
        let mut q = UpdateQuery::new();
        q.table("users").set("active", false).where_(and([]));
        assert_eq!(
            q.render(),
            (
                "UPDATE users SET active = ?".to_string(),
                vec![SqlValue::Bool(false)]
            )
        );
    }

    #[test]
    fn update_limit_offset() {
        let mut q = UpdateQuery::new();
        q.table("t")
            .set_values(ColumnValues::new().with("a", 1))
            .limit(10)
            .offset(5);
        assert_eq!(q.render().0, "UPDATE t SET a = ? LIMIT 10 OFFSET 5");
    }

    #[test]
    fn delete_renders_where_and_limit() {
        let mut q = DeleteQuery::new();
        q.delete_from("sessions")
            .where_(less_than("expires_at", 100))
            .limit(50);
        assert_eq!(
            q.render(),
            (
                "DELETE FROM sessions WHERE expires_at < ? LIMIT 50".to_string(),
                vec![SqlValue::I64(100)]
            )
        );

        let mut all = DeleteQuery::new();
        all.delete_from("sessions");
        assert_eq!(all.render(), ("DELETE FROM sessions".to_string(), vec![]));
    }

    #[derive(Debug)]
    struct User {
        id: i64,
        name: &'static str,
    }

    #[test]
    fn typed_update_evaluates_functions_at_prepare() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let user = User { id: 9, name: "Ann" };

        let mut q = TypedUpdateQuery::<User>::new();
        q.table("users");
        q.values_fn(move |u: &User| {
            seen.fetch_add(1, Ordering::SeqCst);
            ColumnValues::new().with("name", u.name)
        });
        q.condition_fn(|u: &User| equal("id", u.id));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        q.target(&user);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(
            q.render(),
            (
                "UPDATE users SET name = ? WHERE id = ?".to_string(),
                vec![SqlValue::from("Ann"), SqlValue::I64(9)]
            )
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn typed_delete_combines_condition_with_existing() {
        let user = User { id: 4, name: "Jim" };
        let mut q = TypedDeleteQuery::<User>::new();
        q.delete_from("users").where_(equal("tenant", 2));
        q.condition_fn(|u: &User| equal("id", u.id));
        q.target(&user);

        assert_eq!(
            q.prepare().render(),
            (
                "DELETE FROM users WHERE (tenant = ? AND id = ?)".to_string(),
                vec![SqlValue::I64(2), SqlValue::I64(4)]
            )
        );
        assert_eq!(user.name, "Jim");
    }
}
