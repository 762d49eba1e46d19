#[cfg(test)]
mod tests {
    use crate::test_store::{Call, TestStore};
    use crate::{
        ColumnValues, Error, Flavor, HookStage, RecordBinder, Repository, SelectQuery, SqlValue,
        StatementKind, StoreError, TypedRepository, equal, greater_than, targets,
    };
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct User {
        id: i64,
        name: String,
        email: Option<String>,
    }

    impl User {
        fn new(id: i64, name: &str) -> Self {
            Self {
                id,
                name: name.to_string(),
                email: None,
            }
        }
    }

    fn user_binder() -> RecordBinder<User> {
        RecordBinder::new()
            .select_targets(|u: &mut User| targets![&mut u.id, &mut u.name, &mut u.email])
            .insert_values(|u: &User| {
                ColumnValues::new()
                    .with("id", u.id)
                    .with("name", u.name.clone())
                    .with("email", u.email.clone())
            })
            .update_values(|u: &User| {
                ColumnValues::new()
                    .with("name", u.name.clone())
                    .with("email", u.email.clone())
            })
            .update_condition(|u: &User| equal("id", u.id))
    }

    fn users(store: &TestStore, binder: RecordBinder<User>) -> TypedRepository<User, TestStore> {
        let repo = Repository::new(store.clone())
            .table("users")
            .select_columns(["id", "name", "email"])
            .flavor(Some(Flavor::MySQL));
        TypedRepository::new(repo, binder)
    }

    fn row(id: i64, name: &str, email: Option<&str>) -> Vec<SqlValue> {
        vec![
            SqlValue::I64(id),
            SqlValue::from(name.to_string()),
            SqlValue::from(email.map(str::to_string)),
        ]
    }

    #[test]
    fn query_maps_every_row() {
        let store = TestStore::new().with_rows(vec![
            row(1, "Jim", Some("jim@example.com")),
            row(2, "Ann", None),
        ]);
        let repo = users(&store, user_binder());

        let got = repo
            .query_with(|q| {
                q.where_(greater_than("id", 0)).order_by_asc("id");
            })
            .unwrap();

        assert_eq!(
            got,
            vec![
                User {
                    email: Some("jim@example.com".into()),
                    ..User::new(1, "Jim")
                },
                User::new(2, "Ann"),
            ]
        );
        assert_eq!(
            store.calls(),
            vec![
                Call::Prepare(
                    "SELECT id, name, email FROM users WHERE id > ? ORDER BY id ASC".to_string()
                ),
                Call::Query(vec![SqlValue::I64(0)]),
                Call::CloseStatement,
                Call::CloseRows,
            ]
        );
    }

    #[test]
    fn query_with_no_rows_is_empty() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());
        assert!(repo.query(repo.select_query()).unwrap().is_empty());
    }

    #[test]
    fn query_row_returns_one_record() {
        let store = TestStore::new().with_rows(vec![row(5, "Bob", None)]);
        let repo = users(&store, user_binder());

        let got = repo
            .query_row_with(|q| {
                q.where_(equal("id", 5));
            })
            .unwrap();
        assert_eq!(got, User::new(5, "Bob"));
    }

    #[test]
    fn query_row_without_rows_is_not_found() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());

        let err = repo.query_row(repo.select_query()).unwrap_err();
        assert!(err.is_no_rows());
    }

    #[test]
    fn partial_select_overrides_targets() {
        let store = TestStore::new().with_rows(vec![vec![SqlValue::from("Jim")]]);
        let repo = users(&store, user_binder());

        let got = repo
            .query_row_with(|q| {
                q.select(["name"]);
                q.targets(|u| targets![&mut u.name]);
            })
            .unwrap();

        assert_eq!(got, User::new(0, "Jim"));
        assert_eq!(store.prepared(), vec!["SELECT name FROM users".to_string()]);
    }

    #[test]
    fn scan_hooks_run_around_each_row() {
        let store = TestStore::new().with_rows(vec![row(1, "jim", None), row(2, "ann", None)]);
        let tables = Arc::new(Mutex::new(Vec::new()));
        let sink = tables.clone();

        let repo = users(&store, user_binder())
            .pre_scan(move |q: &SelectQuery, u: &mut User| {
                sink.lock().unwrap().push(q.table.clone());
                u.email = Some("unset".into());
                Ok(())
            })
            .post_scan(|_: &SelectQuery, u: &mut User| {
                u.name = u.name.to_uppercase();
                Ok(())
            });

        let got = repo.query(repo.select_query()).unwrap();

        // 扫描会覆盖 pre-scan 写入的字段
        assert_eq!(got, vec![User::new(1, "JIM"), User::new(2, "ANN")]);
        assert_eq!(*tables.lock().unwrap(), vec!["users", "users"]);
    }

    #[test]
    fn failing_scan_hook_aborts_query() {
        let store = TestStore::new().with_rows(vec![row(1, "Jim", None), row(2, "Ann", None)]);
        let repo = users(&store, user_binder()).post_scan(|_: &SelectQuery, u: &mut User| {
            if u.id == 2 {
                return Err("banned".into());
            }
            Ok(())
        });

        let err = repo.query(repo.select_query()).unwrap_err();
        assert_eq!(err.stage(), Some(HookStage::PostScan));
        assert_eq!(err.to_string(), "post scan hook failed: banned");
        assert_eq!(store.calls().last(), Some(&Call::CloseRows));
    }

    #[test]
    fn scan_error_aborts_and_releases_rows() {
        let store = TestStore::new().with_rows(vec![
            row(1, "Jim", None),
            vec!["oops".into(), "Ann".into(), SqlValue::Null],
        ]);
        let repo = users(&store, user_binder());

        let err = repo.query(repo.select_query()).unwrap_err();
        assert!(matches!(err, Error::Scan(StoreError::Scan(_))));
        assert_eq!(err.to_string(), "could not scan row: cannot scan string into i64");
        assert_eq!(store.calls().last(), Some(&Call::CloseRows));
    }

    #[test]
    fn insert_expands_records_in_order() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());
        let jim = User::new(1, "Jim");
        let ann = User {
            email: Some("ann@example.com".into()),
            ..User::new(2, "Ann")
        };

        repo.insert_with(|q| {
            q.targets([&jim, &ann]);
        })
        .unwrap();

        assert_eq!(
            store.calls()[..2].to_vec(),
            vec![
                Call::Prepare(
                    "INSERT INTO users(id, name, email) VALUES (?, ?, ?), (?, ?, ?)".to_string()
                ),
                Call::Execute(vec![
                    SqlValue::I64(1),
                    "Jim".into(),
                    SqlValue::Null,
                    SqlValue::I64(2),
                    "Ann".into(),
                    "ann@example.com".into(),
                ]),
            ]
        );
    }

    #[test]
    fn update_uses_binder_values_and_condition() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());
        let jim = User::new(1, "Jim");

        let mut q = repo.update_query();
        q.target(&jim);
        repo.update(q).unwrap();

        assert_eq!(
            store.calls()[..2].to_vec(),
            vec![
                Call::Prepare("UPDATE users SET name = ?, email = ? WHERE id = ?".to_string()),
                Call::Execute(vec!["Jim".into(), SqlValue::Null, SqlValue::I64(1)]),
            ]
        );
    }

    #[test]
    fn update_override_beats_binder() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());
        let jim = User::new(1, "Jim");

        repo.update_with(|q| {
            q.values_fn(|u: &User| ColumnValues::new().with("name", u.name.clone()));
            q.target(&jim);
        })
        .unwrap();

        assert_eq!(
            store.prepared(),
            vec!["UPDATE users SET name = ? WHERE id = ?".to_string()]
        );
    }

    #[test]
    fn delete_falls_back_to_update_condition() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());
        let jim = User::new(3, "Jim");

        repo.delete_with(|q| {
            q.target(&jim);
        })
        .unwrap();

        assert_eq!(
            store.calls()[..2].to_vec(),
            vec![
                Call::Prepare("DELETE FROM users WHERE id = ?".to_string()),
                Call::Execute(vec![SqlValue::I64(3)]),
            ]
        );
    }

    #[test]
    fn delete_prefers_delete_condition() {
        let store = TestStore::new();
        let binder = user_binder().delete_condition(|u: &User| equal("name", u.name.clone()));
        let repo = users(&store, binder);
        let jim = User::new(3, "Jim");

        repo.delete_with(|q| {
            q.target(&jim);
        })
        .unwrap();

        assert_eq!(
            store.prepared(),
            vec!["DELETE FROM users WHERE name = ?".to_string()]
        );
    }

    #[test]
    fn missing_binder_functions_fail_before_store() {
        let store = TestStore::new();
        let repo = users(&store, RecordBinder::new());
        let jim = User::new(1, "Jim");

        let err = repo.query(repo.select_query()).unwrap_err();
        assert!(matches!(err, Error::Binder("select_targets")));

        let err = repo
            .insert_with(|q| {
                q.target(&jim);
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "record binder has no insert_values function");

        let err = repo
            .delete_with(|q| {
                q.target(&jim);
            })
            .unwrap_err();
        assert!(matches!(err, Error::Binder("delete_condition")));

        assert!(store.calls().is_empty());
    }

    #[test]
    fn writes_without_target_never_reach_store() {
        let store = TestStore::new();
        let repo = users(&store, user_binder());

        let err = repo.delete_with(|_| {}).unwrap_err();
        assert!(matches!(err, Error::NoTarget(StatementKind::Delete)));
        assert_eq!(err.to_string(), "typed delete has no target record");

        let err = repo.update_with(|_| {}).unwrap_err();
        assert!(matches!(err, Error::NoTarget(StatementKind::Update)));

        let err = repo.insert(repo.insert_query()).unwrap_err();
        assert!(matches!(err, Error::NoTarget(StatementKind::Insert)));

        let err = repo
            .insert_with(|q| {
                q.targets(Vec::new());
            })
            .unwrap_err();
        assert!(matches!(err, Error::NoTarget(StatementKind::Insert)));

        assert!(store.calls().is_empty());
    }

    #[test]
    fn inner_repository_hooks_see_expanded_statement() {
        let store = TestStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let repo = Repository::new(store.clone())
            .table("users")
            .flavor(Some(Flavor::MySQL))
            .pre_insert(move |stmt| {
                let (sql, _) = crate::Builder::render(stmt);
                sink.lock().unwrap().push(sql);
                Err("read only".into())
            });
        let repo = TypedRepository::new(repo, user_binder());
        let jim = User::new(1, "Jim");

        let err = repo
            .insert_with(|q| {
                q.target(&jim);
            })
            .unwrap_err();
        assert_eq!(err.stage(), Some(HookStage::PreInsert));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["INSERT INTO users(id, name, email) VALUES (?, ?, ?)".to_string()]
        );
        assert!(store.calls().is_empty());
    }

    #[test]
    fn scan_row_maps_any_row() {
        let store = TestStore::new().with_rows(vec![row(8, "Eve", Some("eve@example.com"))]);
        let repo = users(&store, user_binder());

        let query = repo.repository().select_defaults(SelectQuery::new());
        let mut raw = repo.repository().query_row(query.clone()).unwrap();
        let got = repo.scan_row(&query, raw.as_mut()).unwrap();
        assert_eq!(got.email.as_deref(), Some("eve@example.com"));
    }
}
