/// Read-through caching against an optional [`Cache`](crate::db::Cache).
///
/// With `Some(cache)`, a hit is returned as-is. A miss, or a failed cache read,
/// runs `$block`, queues the value for a background write and returns it.
/// With `None` the block is simply awaited. Expands to an `AppResult<T>`;
/// errors from `$block` propagate with `?`.
///
/// # Example
/// ```rust,ignore
/// let tags: Vec<Tag> = cached!(state.cache.as_ref(), CacheKey::Tags, async {
///     store.tags().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        match $cache {
            Some(cache) => {
                let key = $key;
                match cache.get_from_cache(&key).await {
                    Ok(Some(hit)) => {
                        tracing::debug!(key = %key, "Cache hit");
                        Ok(hit)
                    }
                    outcome => {
                        if let Err(e) = outcome {
                            tracing::warn!(key = %key, error = %e, "Cache read failed, recomputing");
                        }
                        let value = $block.await?;
                        cache.set_in_background(&key, &value);
                        Ok(value)
                    }
                }
            }
            None => $block.await,
        }
    }};
}
