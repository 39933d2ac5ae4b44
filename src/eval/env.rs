use crate::common::Int;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Variable bindings visible to a single evaluation.
pub trait Environment {
    fn lookup(&self, name: &str) -> Option<Int>;
}

/// The empty environment.
impl Environment for () {
    fn lookup(&self, _name: &str) -> Option<Int> {
        None
    }
}

/// A single binding.
impl<K: AsRef<str>> Environment for (K, Int) {
    fn lookup(&self, name: &str) -> Option<Int> {
        (self.0.as_ref() == name).then_some(self.1)
    }
}

impl<S: BuildHasher> Environment for HashMap<String, Int, S> {
    fn lookup(&self, name: &str) -> Option<Int> {
        self.get(name).copied()
    }
}

impl Environment for BTreeMap<String, Int> {
    fn lookup(&self, name: &str) -> Option<Int> {
        self.get(name).copied()
    }
}

impl<K: AsRef<str>> Environment for [(K, Int)] {
    fn lookup(&self, name: &str) -> Option<Int> {
        self.iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|&(_, value)| value)
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn lookup(&self, name: &str) -> Option<Int> {
        (**self).lookup(name)
    }
}
