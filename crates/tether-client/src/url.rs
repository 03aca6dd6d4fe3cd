//! Connection URL construction with resumption parameters.

use tether_protocol::{PARAM_CLIENT_ID, PARAM_LAST_NUM};
use url::form_urlencoded;

/// Builds the URI actually dialled from the endpoint the application gave us
/// plus identity and resumption state.
///
/// Parameter order is stable: `id`, then `lastnum`. No separator is appended
/// when there is nothing to carry. A base that already holds a query string
/// gets `&`-joined parameters instead of a second `?`.
pub fn connection_url(base: &str, client_id: Option<&str>, last_num: Option<u64>) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if let Some(id) = client_id {
        params.append_pair(PARAM_CLIENT_ID, id);
    }
    if let Some(num) = last_num {
        params.append_pair(PARAM_LAST_NUM, &num.to_string());
    }
    let query = params.finish();
    if query.is_empty() {
        return base.to_string();
    }
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}{query}")
}
