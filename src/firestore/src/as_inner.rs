// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;

/// Finds the first error of type `T` in the `source()` chain of `error`.
///
/// The search starts at `error.source()`, `error` itself is never returned.
pub(crate) fn as_inner<T, E>(error: &E) -> Option<&T>
where
    T: Error + 'static,
    E: Error + ?Sized,
{
    let mut e = error.source()?;
    // Cycles in the `source()` chain would loop forever.
    for _ in 0..32 {
        if let Some(value) = e.downcast_ref::<T>() {
            return Some(value);
        }
        e = e.source()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_at_any_depth() {
        let err = Wrapped::Inner(Base.into());
        assert!(as_inner::<Base, _>(&err).is_some());

        let err = Wrapped::Inner(err.into());
        assert!(as_inner::<Base, _>(&err).is_some());

        let err = Wrapped::Inner(err.into());
        assert!(as_inner::<Base, _>(&err).is_some());
    }

    #[test]
    fn not_found() {
        let err = Wrapped::Inner("not the base error".into());
        assert!(as_inner::<Base, _>(&err).is_none());

        let err = Wrapped::Inner(err.into());
        assert!(as_inner::<Base, _>(&err).is_none());
    }

    #[test]
    fn skips_the_outer_error() {
        assert!(as_inner::<Base, _>(&Base).is_none());
    }

    #[test]
    fn cycles_terminate() {
        assert!(as_inner::<Base, _>(&Cycle).is_none());
        assert!(as_inner::<Cycle, _>(&Cycle).is_some());
    }

    #[derive(Debug, thiserror::Error)]
    #[error("base error")]
    struct Base;

    #[derive(Debug, thiserror::Error)]
    enum Wrapped {
        #[error("wrapped: {0}")]
        Inner(#[source] Box<dyn Error + Send + Sync>),
    }

    #[derive(Debug)]
    struct Cycle;

    impl std::fmt::Display for Cycle {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "cycle")
        }
    }

    impl Error for Cycle {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self)
        }
    }
}
