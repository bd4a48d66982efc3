use engine_primitives::EngineApiError;
use jsonrpsee_types::ErrorObjectOwned;

/// Converts a dispatcher-level condition into a JSON-RPC error object, using
/// the canonical code table.
pub fn to_error_object(err: EngineApiError) -> ErrorObjectOwned {
    let code = err.code().code();
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

pub type EngineApiResult<T> = Result<T, EngineApiError>;
