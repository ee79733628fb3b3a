/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Native (desktop / server / embedded) platform primitives.

use std::future::Future;

/// Spawn a non-`Send` task on the current thread.
///
/// **Important:** must be called from inside a `tokio::task::LocalSet`. The binding keeps its
/// state in `Rc`/`RefCell`, so its tasks never leave the thread that created them.
pub fn spawn_local<F: Future<Output = ()> + 'static>(future: F) {
    tokio::task::spawn_local(future);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_spawn_local_executes_future() {
        let local = tokio::task::LocalSet::new();
        let flag = Rc::new(Cell::new(false));
        let flag_clone = flag.clone();

        local
            .run_until(async move {
                spawn_local(async move {
                    flag_clone.set(true);
                });
                tokio::task::yield_now().await;
            })
            .await;

        assert!(flag.get(), "spawned future should have run");
    }
}
