//! Tests for the ordered hierarchical store.

use super::Store;

mod set_and_get {
    use super::*;

    #[test]
    fn get_returns_stored_value() {
        let mut store = Store::new();
        store.set(&["ifaces", "lan1", "source"], "on");

        assert_eq!(store.get(&["ifaces", "lan1", "source"]), Some("on"));
    }

    #[test]
    fn get_unknown_path_returns_none() {
        let store = Store::new();
        assert_eq!(store.get(&["nothing", "here"]), None);
    }

    #[test]
    fn get_intermediate_path_returns_none() {
        let mut store = Store::new();
        store.set(&["a", "b", "c"], "1");

        assert_eq!(store.get(&["a", "b"]), None);
        assert!(store.contains(&["a", "b"]));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut store = Store::new();
        store.set(&["a", "valid"], "1800");
        store.set(&["a", "valid"], "900");

        assert_eq!(store.get(&["a", "valid"]), Some("900"));
    }

    #[test]
    fn set_empty_value_is_noop() {
        let mut store = Store::new();
        store.set(&["a", "b"], "");

        assert!(!store.contains(&["a", "b"]));
        assert!(!store.contains(&["a"]));
        assert_eq!(store.child_count::<&str>(&[]), 0);
    }

    #[test]
    fn set_empty_value_keeps_previous_value() {
        let mut store = Store::new();
        store.set(&["a"], "x");
        store.set(&["a"], "");

        assert_eq!(store.get(&["a"]), Some("x"));
    }

    #[test]
    fn accepts_owned_string_components() {
        let mut store = Store::new();
        let path = vec!["ifaces".to_string(), "eth0".to_string()];
        store.set(&path, "on");

        assert_eq!(store.get(&["ifaces", "eth0"]), Some("on"));
    }
}

mod ordering {
    use super::*;

    #[test]
    fn nth_child_follows_insertion_order() {
        let mut store = Store::new();
        store.set(&["parent", "a"], "1");
        store.set(&["parent", "b"], "1");
        store.set(&["parent", "c"], "1");

        assert_eq!(store.nth_child(&["parent"], 2), Some("c"));
        assert_eq!(store.nth_child(&["parent"], 0), Some("a"));
        assert_eq!(store.nth_child(&["parent"], 1), Some("b"));
    }

    #[test]
    fn reinserting_child_keeps_original_position() {
        let mut store = Store::new();
        store.set(&["parent", "a"], "1");
        store.set(&["parent", "b"], "1");
        store.set(&["parent", "c"], "1");
        store.set(&["parent", "a"], "2");
        store.set(&["parent", "a", "deeper"], "3");

        let children: Vec<&str> = store.children(&["parent"]).collect();
        assert_eq!(children, ["a", "b", "c"]);
        assert_eq!(store.get(&["parent", "a"]), Some("2"));
    }

    #[test]
    fn nth_child_out_of_range_returns_none() {
        let mut store = Store::new();
        store.set(&["parent", "a"], "1");

        assert_eq!(store.nth_child(&["parent"], 1), None);
        assert_eq!(store.nth_child(&["missing"], 0), None);
    }

    #[test]
    fn ancestors_are_registered_in_order() {
        let mut store = Store::new();
        store.set(&["ifaces", "lan1", "prefix", "fd00:1::/64", "src", "valid"], "infinity");
        store.set(&["ifaces", "lan0", "source"], "on");
        store.set(&["ifaces", "lan1", "prefix", "fd00:2::/64", "wired", "valid"], "1800");

        let ifaces: Vec<&str> = store.children(&["ifaces"]).collect();
        assert_eq!(ifaces, ["lan1", "lan0"]);

        let prefixes: Vec<&str> = store.children(&["ifaces", "lan1", "prefix"]).collect();
        assert_eq!(prefixes, ["fd00:1::/64", "fd00:2::/64"]);
    }

    #[test]
    fn children_are_scoped_to_their_parent() {
        let mut store = Store::new();
        store.set(&["x", "one"], "1");
        store.set(&["y", "two"], "1");

        assert_eq!(store.child_count(&["x"]), 1);
        assert_eq!(store.nth_child(&["y"], 0), Some("two"));
    }
}

mod branches {
    use super::*;

    #[test]
    fn same_component_under_different_parents_is_independent() {
        let mut store = Store::new();
        store.set(&["ifaces", "lan1", "prefix", "fd00:1::/64", "valid"], "1800");
        store.set(&["ifaces", "lan2", "prefix", "fd00:1::/64", "valid"], "600");

        assert_eq!(store.get(&["ifaces", "lan1", "prefix", "fd00:1::/64", "valid"]), Some("1800"));
        assert_eq!(store.get(&["ifaces", "lan2", "prefix", "fd00:1::/64", "valid"]), Some("600"));
        assert_eq!(store.child_count(&["ifaces", "lan2", "prefix"]), 1);
    }
}
