#[cfg(test)]
mod tests {
    use crate::{
        Builder, Flavor, JoinKind, OrderBy, SelectQuery, SqlValue, TypedSelectQuery, and, equal,
        greater_than, in_list, set_default_flavor_scoped,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn select_full_clause_order() {
        let _g = set_default_flavor_scoped(Flavor::MySQL);
        let mut q = SelectQuery::new();
        q.select(["id", "name"])
            .from("users")
            .where_(equal("id", 1))
            .order_by_desc("name")
            .order_by_asc("id")
            .limit(5)
            .offset(2);

        assert_eq!(
            q.build(),
            (
                "SELECT id, name FROM users WHERE id = ? ORDER BY name DESC, id ASC LIMIT 5 OFFSET 2"
                    .to_string(),
                vec![SqlValue::I64(1)]
            )
        );
    }

    #[test]
    fn select_without_columns_uses_star() {
        let mut q = SelectQuery::new();
        q.from("users");
        assert_eq!(q.render().0, "SELECT * FROM users");

        q.select(Vec::<&str>::new());
        assert_eq!(q.render().0, "SELECT * FROM users");
    }

    #[test]
    fn empty_condition_and_non_positive_limits_are_omitted() {
        let mut q = SelectQuery::new();
        q.select(["id"])
            .from("users")
            .where_(and([]))
            .limit(0)
            .offset(-1);
        assert_eq!(q.render(), ("SELECT id FROM users".to_string(), vec![]));
    }

    #[test]
    fn joins_render_before_where_and_bind_first() {
        let mut q = SelectQuery::new();
        q.select(["u.id", "o.total"])
            .from("users u")
            .join(
                Some(JoinKind::LeftJoin),
                "orders o",
                and([
                    crate::raw("o.user_id = u.id", Vec::<SqlValue>::new()),
                    greater_than("o.total", 10),
                ]),
            )
            .join(None, "teams t", crate::raw("t.id = u.team_id", Vec::<SqlValue>::new()))
            .join(Some(JoinKind::FullOuterJoin), "audit a", and([]))
            .where_(equal("u.active", true));

        assert_eq!(
            q.render(),
            (
                "SELECT u.id, o.total FROM users u LEFT JOIN orders o ON (o.user_id = u.id AND o.total > ?) JOIN teams t ON t.id = u.team_id FULL OUTER JOIN audit a WHERE u.active = ?"
                    .to_string(),
                vec![SqlValue::I64(10), SqlValue::Bool(true)]
            )
        );
    }

    #[test]
    fn where_calls_are_combined_with_and() {
        let mut q = SelectQuery::new();
        q.from("t").where_(equal("a", 1)).where_(in_list("b", [2, 3]));
        assert_eq!(
            q.render(),
            (
                "SELECT * FROM t WHERE (a = ? AND b IN (?, ?))".to_string(),
                vec![SqlValue::I64(1), SqlValue::I64(2), SqlValue::I64(3)]
            )
        );
    }

    #[test]
    fn order_by_items() {
        let mut q = SelectQuery::new();
        q.from("t")
            .order_by(OrderBy::new("a", Default::default()))
            .order_by(OrderBy::desc("b"));
        assert_eq!(q.render().0, "SELECT * FROM t ORDER BY a ASC, b DESC");
    }

    #[test]
    fn placeholders_follow_flavor() {
        let mut q = SelectQuery::new();
        q.from("t").where_(and([equal("a", 1), equal("b", "x")]));

        assert_eq!(
            q.build_with_flavor(Flavor::PostgreSQL).0,
            "SELECT * FROM t WHERE (a = $1 AND b = $2)"
        );
        assert_eq!(
            q.build_with_flavor(Flavor::SQLServer).0,
            "SELECT * FROM t WHERE (a = @p1 AND b = @p2)"
        );

        let _g = set_default_flavor_scoped(Flavor::PostgreSQL);
        assert_eq!(q.build().0, "SELECT * FROM t WHERE (a = $1 AND b = $2)");
    }

    #[test]
    fn rendering_twice_is_identical() {
        let mut q = SelectQuery::new();
        q.select(["a"]).from("t").where_(equal("a", 1)).limit(3);
        assert_eq!(q.render(), q.render());
    }

    #[derive(Debug, Default)]
    struct User {
        id: i64,
    }

    #[test]
    fn typed_select_derefs_to_plain_query() {
        let mut q = TypedSelectQuery::<User>::new();
        q.select(["id"]).from("users").where_(equal("id", 7));
        q.targets(|u| crate::targets![&mut u.id]);

        assert!(q.targets.is_some());
        assert_eq!(q.prepare(), q.query);
        assert_eq!(
            q.render(),
            (
                "SELECT id FROM users WHERE id = ?".to_string(),
                vec![SqlValue::I64(7)]
            )
        );

        let mut user = User::default();
        let targets = q.targets.clone().unwrap();
        let mut dests = targets(&mut user);
        crate::scan_values(&[SqlValue::I64(7)], &mut dests).unwrap();
        drop(dests);
        assert_eq!(user.id, 7);
    }
}
