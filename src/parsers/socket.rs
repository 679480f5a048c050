use crate::models::ComponentRecord;

pub const SOCKET_PREFIX: &str = "Socket ";

/// Strips the site's `"Socket "` prefix. Values without it come back as-is;
/// the prefix is a rendering habit of the site, not a guarantee.
pub fn strip_socket_prefix(socket: &str) -> &str {
    socket.strip_prefix(SOCKET_PREFIX).unwrap_or(socket)
}

/// Socket name of a listing record, `None` when the listing has no
/// `Socket` column.
pub fn socket_name(record: &ComponentRecord) -> Option<&str> {
    record.get("Socket").map(strip_socket_prefix)
}
