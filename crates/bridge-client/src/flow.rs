//! Workflow-state adapter.
//!
//! Graph frameworks pass a JSON-ish state map from node to node. This
//! adapter gives such nodes a one-line way to perform a bridge call and
//! record what happened for downstream nodes to inspect.

use serde_json::{Map, Value, json};

use bridge_core::BridgeError;

use crate::client::BridgeClient;

/// State key the most recent bridge call is recorded under.
pub const LAST_CALL_KEY: &str = "bridge:last";

/// Perform one bridge call and thread it through a workflow state map.
///
/// Returns a new state: the input plus a [`LAST_CALL_KEY`] entry holding
/// the method, the caller's params (auth never included), and the
/// result. On error the input state is left untouched and the error
/// propagates to the graph's own failure handling.
pub async fn bridge_call(
    client: &BridgeClient,
    state: &Map<String, Value>,
    method: &str,
    params: Option<Value>,
) -> Result<Map<String, Value>, BridgeError> {
    let recorded_params = params.clone().unwrap_or_else(|| json!({}));
    let result = client.call(method, params).await?;
    let mut next = state.clone();
    let _ = next.insert(
        LAST_CALL_KEY.to_owned(),
        json!({
            "method": method,
            "params": recorded_params,
            "result": result,
        }),
    );
    Ok(next)
}
