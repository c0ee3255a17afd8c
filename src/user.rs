use indexmap::{IndexMap, IndexSet};

/// Namespace used when a privilege is not given one explicitly.
pub const DEFAULT_NAMESPACE: &str = "org.mojavi";

/// A privilege required by an action, scoped to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Privilege {
    /// Privilege name
    pub name: String,
    /// Namespace the privilege lives in
    pub namespace: String,
}

impl Privilege {
    /// Creates a privilege in the default namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self::in_namespace(name, DEFAULT_NAMESPACE)
    }

    /// Creates a privilege in an explicit namespace.
    pub fn in_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// Privilege namespaces keyed by namespace name.
pub type PrivilegeMap = IndexMap<String, IndexSet<String>>;

/// The user on whose behalf a request runs.
///
/// Holds an authenticated flag and a set of privileges grouped into
/// namespaces. The user owns its privilege map: merges copy the incoming
/// entries and never share storage with the caller.
///
/// # Examples
///
/// ```
/// use dispatch_core::User;
///
/// let mut user = User::new();
/// user.set_authenticated(true);
/// user.add_privilege("edit", "news");
///
/// assert!(user.has_privilege("edit", "news"));
/// assert!(!user.has_privilege("delete", "news"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    authenticated: bool,
    privileges: PrivilegeMap,
}

impl User {
    /// Creates an unauthenticated user with no privileges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authenticated user with no privileges.
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            privileges: PrivilegeMap::new(),
        }
    }

    /// Returns true if the user has been authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Sets the authenticated status.
    pub fn set_authenticated(&mut self, status: bool) {
        self.authenticated = status;
    }

    /// Clears authentication and every privilege.
    pub fn clear_all(&mut self) {
        self.authenticated = false;
        self.clear_privileges();
    }

    /// Grants a privilege, creating the namespace if needed.
    pub fn add_privilege(&mut self, name: impl Into<String>, namespace: impl Into<String>) {
        self.privileges
            .entry(namespace.into())
            .or_default()
            .insert(name.into());
    }

    /// Returns true if the user holds `name` in `namespace`.
    pub fn has_privilege(&self, name: &str, namespace: &str) -> bool {
        self.privileges
            .get(namespace)
            .is_some_and(|names| names.contains(name))
    }

    /// Returns true if the user holds the given privilege.
    pub fn holds(&self, privilege: &Privilege) -> bool {
        self.has_privilege(&privilege.name, &privilege.namespace)
    }

    /// Removes a single privilege. The namespace is kept even if it empties.
    pub fn remove_privilege(&mut self, name: &str, namespace: &str) -> bool {
        self.privileges
            .get_mut(namespace)
            .is_some_and(|names| names.shift_remove(name))
    }

    /// Removes a namespace and all of its privileges.
    pub fn remove_privileges(&mut self, namespace: &str) -> Option<IndexSet<String>> {
        self.privileges.shift_remove(namespace)
    }

    /// Removes every privilege in every namespace.
    pub fn clear_privileges(&mut self) {
        self.privileges.clear();
    }

    /// Returns the namespace names in the order they were created.
    pub fn namespaces(&self) -> Vec<&str> {
        self.privileges.keys().map(String::as_str).collect()
    }

    /// Returns the privileges held in `namespace`, if the namespace exists.
    pub fn privileges(&self, namespace: &str) -> Option<Vec<&str>> {
        self.privileges
            .get(namespace)
            .map(|names| names.iter().map(String::as_str).collect())
    }

    /// Merges a privilege map into this user.
    ///
    /// Existing namespaces gain the incoming names; unknown namespaces are
    /// copied whole.
    pub fn merge_privileges(&mut self, privileges: &PrivilegeMap) {
        for (namespace, names) in privileges {
            self.privileges
                .entry(namespace.clone())
                .or_default()
                .extend(names.iter().cloned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &[&str])]) -> PrivilegeMap {
        entries
            .iter()
            .map(|(ns, names)| {
                (
                    ns.to_string(),
                    names.iter().map(|n| n.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn new_user_is_anonymous() {
        let user = User::new();
        assert!(!user.is_authenticated());
        assert!(user.namespaces().is_empty());
    }

    #[test]
    fn default_namespace_privilege() {
        let mut user = User::new();
        user.add_privilege("admin", DEFAULT_NAMESPACE);

        assert!(user.holds(&Privilege::new("admin")));
        assert!(!user.holds(&Privilege::in_namespace("admin", "news")));
    }

    #[test]
    fn remove_privilege_keeps_namespace() {
        let mut user = User::new();
        user.add_privilege("edit", "news");

        assert!(user.remove_privilege("edit", "news"));
        assert!(!user.remove_privilege("edit", "news"));
        assert_eq!(user.privileges("news"), Some(vec![]));
    }

    #[test]
    fn remove_privileges_drops_namespace() {
        let mut user = User::new();
        user.add_privilege("edit", "news");
        user.add_privilege("view", "forum");

        assert!(user.remove_privileges("news").is_some());
        assert_eq!(user.namespaces(), vec!["forum"]);
        assert!(user.privileges("news").is_none());
    }

    #[test]
    fn merge_extends_existing_and_copies_new_namespaces() {
        let mut user = User::new();
        user.add_privilege("view", "news");

        let incoming = map(&[("news", &["edit"]), ("forum", &["post", "reply"])]);
        user.merge_privileges(&incoming);

        assert_eq!(user.privileges("news"), Some(vec!["view", "edit"]));
        assert_eq!(user.privileges("forum"), Some(vec!["post", "reply"]));
        assert_eq!(user.namespaces(), vec!["news", "forum"]);
    }

    #[test]
    fn merged_map_is_not_aliased() {
        let mut user = User::new();
        let mut incoming = map(&[("forum", &["post"])]);
        user.merge_privileges(&incoming);

        incoming
            .get_mut("forum")
            .expect("namespace present")
            .insert("moderate".to_string());

        assert!(!user.has_privilege("moderate", "forum"));
    }

    #[test]
    fn clear_all_resets_user() {
        let mut user = User::authenticated();
        user.add_privilege("edit", "news");

        user.clear_all();

        assert!(!user.is_authenticated());
        assert!(!user.has_privilege("edit", "news"));
    }
}
