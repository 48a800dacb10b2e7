#[cfg(test)]
mod tests {
    use quiver_catalog::{CatalogItem, CatalogSource, CatalogStore};
    use quiver_core::{ItemKind, Visibility};
    use uuid::Uuid;

    fn skill(name: &str) -> CatalogItem {
        CatalogItem::new(ItemKind::Skill, name, format!("instructions for {name}"))
    }

    fn workflow(name: &str) -> CatalogItem {
        CatalogItem::new(ItemKind::Workflow, name, format!("stages for {name}"))
    }

    // ── Items ──────────────────────────────────────────────────

    mod items {
        use super::*;

        #[test]
        fn upsert_and_get_roundtrip() {
            let store = CatalogStore::open_in_memory().unwrap();
            let item = skill("git-rebase")
                .with_description("Rebase branches safely")
                .with_tags(vec!["git".into(), "vcs".into()])
                .with_part_count(3);
            store.upsert_item(&item).unwrap();

            let loaded = store.get_item(item.id).unwrap().unwrap();
            assert_eq!(loaded.name, "git-rebase");
            assert_eq!(loaded.description.as_deref(), Some("Rebase branches safely"));
            assert_eq!(loaded.tags, vec!["git", "vcs"]);
            assert_eq!(loaded.part_count, 3);
            assert_eq!(loaded.kind, ItemKind::Skill);
            assert!(loaded.is_live());
        }

        #[test]
        fn upsert_twice_updates_in_place() {
            let store = CatalogStore::open_in_memory().unwrap();
            let mut item = workflow("release");
            store.upsert_item(&item).unwrap();

            item.name = "release-v2".into();
            item.visibility = Visibility::Public;
            store.upsert_item(&item).unwrap();

            let loaded = store.get_item(item.id).unwrap().unwrap();
            assert_eq!(loaded.name, "release-v2");
            assert_eq!(loaded.visibility, Visibility::Public);
        }

        #[test]
        fn get_unknown_item_is_none() {
            let store = CatalogStore::open_in_memory().unwrap();
            assert!(store.get_item(Uuid::new_v4()).unwrap().is_none());
        }

        #[test]
        fn set_active_and_soft_delete() {
            let store = CatalogStore::open_in_memory().unwrap();
            let item = skill("deploy");
            store.upsert_item(&item).unwrap();

            assert!(store.set_active(item.id, false).unwrap());
            let loaded = store.get_item(item.id).unwrap().unwrap();
            assert!(!loaded.is_active);
            assert!(!loaded.is_live());

            assert!(store.set_active(item.id, true).unwrap());
            assert!(store.soft_delete(item.id).unwrap());
            let loaded = store.get_item(item.id).unwrap().unwrap();
            assert!(loaded.deleted_at.is_some());
            assert!(!loaded.is_live());

            // Unknown ids report false
            assert!(!store.set_active(Uuid::new_v4(), true).unwrap());
            assert!(!store.soft_delete(Uuid::new_v4()).unwrap());
        }

        #[test]
        fn persists_across_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("catalog.db");
            let item = workflow("migrate");
            {
                let store = CatalogStore::open(&path).unwrap();
                store.upsert_item(&item).unwrap();
            }
            let store = CatalogStore::open(&path).unwrap();
            let loaded = store.get_item(item.id).unwrap().unwrap();
            assert_eq!(loaded.name, "migrate");
        }
    }

    // ── References ─────────────────────────────────────────────

    mod references {
        use super::*;

        #[tokio::test]
        async fn add_and_remove_reference() {
            let store = CatalogStore::open_in_memory().unwrap();
            let user = Uuid::new_v4();
            let item = skill("review").as_system();
            store.upsert_item(&item).unwrap();

            store.add_reference(user, item.id).unwrap();
            // Adding twice is idempotent
            store.add_reference(user, item.id).unwrap();

            let referenced = store
                .referenced_system_items(ItemKind::Skill, user)
                .await
                .unwrap();
            assert_eq!(referenced.len(), 1);
            assert_eq!(referenced[0].id, item.id);

            assert!(store.remove_reference(user, item.id).unwrap());
            assert!(!store.remove_reference(user, item.id).unwrap());
            let referenced = store
                .referenced_system_items(ItemKind::Skill, user)
                .await
                .unwrap();
            assert!(referenced.is_empty());
        }

        #[tokio::test]
        async fn references_are_scoped_to_user_and_kind() {
            let store = CatalogStore::open_in_memory().unwrap();
            let user = Uuid::new_v4();
            let other = Uuid::new_v4();
            let s = skill("s").as_system();
            let w = workflow("w").as_system();
            store.upsert_item(&s).unwrap();
            store.upsert_item(&w).unwrap();
            store.add_reference(user, s.id).unwrap();
            store.add_reference(other, w.id).unwrap();

            let skills = store
                .referenced_system_items(ItemKind::Skill, user)
                .await
                .unwrap();
            assert_eq!(skills.len(), 1);
            let workflows = store
                .referenced_system_items(ItemKind::Workflow, user)
                .await
                .unwrap();
            assert!(workflows.is_empty());
        }
    }

    // ── Source queries ─────────────────────────────────────────

    mod source {
        use super::*;

        #[tokio::test]
        async fn system_items_scoped_by_kind_and_flag() {
            let store = CatalogStore::open_in_memory().unwrap();
            store.upsert_item(&skill("sys-skill").as_system()).unwrap();
            store.upsert_item(&skill("user-skill")).unwrap();
            store
                .upsert_item(&workflow("sys-workflow").as_system())
                .unwrap();

            let skills = store.system_items(ItemKind::Skill).await.unwrap();
            assert_eq!(skills.len(), 1);
            assert_eq!(skills[0].name, "sys-skill");

            let workflows = store.system_items(ItemKind::Workflow).await.unwrap();
            assert_eq!(workflows.len(), 1);
        }

        #[tokio::test]
        async fn items_owned_by_filters_owner() {
            let store = CatalogStore::open_in_memory().unwrap();
            let alice = Uuid::new_v4();
            let bob = Uuid::new_v4();
            store.upsert_item(&skill("alice-1").with_owner(alice)).unwrap();
            store.upsert_item(&skill("alice-2").with_owner(alice)).unwrap();
            store.upsert_item(&skill("bob-1").with_owner(bob)).unwrap();

            let owned = store.items_owned_by(ItemKind::Skill, alice).await.unwrap();
            assert_eq!(owned.len(), 2);
            assert!(owned.iter().all(|i| i.owner_id == Some(alice)));
        }
    }

    // ── Embeddings ─────────────────────────────────────────────

    mod embeddings {
        use super::*;

        #[test]
        fn put_get_and_overwrite() {
            let store = CatalogStore::open_in_memory().unwrap();
            let item = skill("embedded");
            store.upsert_item(&item).unwrap();

            assert!(store.get_embedding(item.id).unwrap().is_none());

            store
                .put_embedding(item.id, "text-embedding-3-small", &[0.1, 0.2, 0.3])
                .unwrap();
            assert_eq!(
                store.get_embedding(item.id).unwrap().unwrap(),
                vec![0.1, 0.2, 0.3]
            );

            // Overwrite with a new vector (recomputed after an edit)
            store
                .put_embedding(item.id, "text-embedding-3-small", &[0.9, 0.8, 0.7])
                .unwrap();
            assert_eq!(
                store.get_embedding(item.id).unwrap().unwrap(),
                vec![0.9, 0.8, 0.7]
            );
        }

        #[tokio::test]
        async fn embeddings_for_skips_absent_vectors() {
            let store = CatalogStore::open_in_memory().unwrap();
            let with_vec = skill("has-vector");
            let without_vec = skill("no-vector");
            store.upsert_item(&with_vec).unwrap();
            store.upsert_item(&without_vec).unwrap();
            store
                .put_embedding(with_vec.id, "test-model", &[1.0, 0.0])
                .unwrap();

            let map = store
                .embeddings_for(&[with_vec.id, without_vec.id])
                .await
                .unwrap();
            assert_eq!(map.len(), 1);
            assert!(map.contains_key(&with_vec.id));
            assert!(!map.contains_key(&without_vec.id));
        }
    }
}
