//! Canonical structured event names used across `grex-streams`.

// Port events.
pub const PORT_OUTPUT_UNCONNECTED: &str = "port_output_unconnected";
pub const PORT_INDEX_OUT_OF_RANGE: &str = "port_index_out_of_range";

// Stream selector events.
pub const SELECTOR_CONFIGURE: &str = "selector_configure";
pub const SELECTOR_ROUTE_CODE_INVALID: &str = "selector_route_code_invalid";
pub const SELECTOR_ROUTE_OUTPUT_MISSING: &str = "selector_route_output_missing";
pub const SELECTOR_TOPOLOGY_RESET: &str = "selector_topology_reset";
pub const SELECTOR_TAGS_DROPPED: &str = "selector_tags_dropped";

// TUN/TAP bridge events.
pub const TUNTAP_ALLOCATED: &str = "tuntap_allocated";
pub const TUNTAP_ALLOCATE_FAILED: &str = "tuntap_allocate_failed";
pub const TUNTAP_CLOSED: &str = "tuntap_closed";
pub const FD_WRITE_OK: &str = "fd_write_ok";
pub const FD_WRITE_FAILED: &str = "fd_write_failed";
pub const FD_WRITE_SHORT: &str = "fd_write_short";
pub const FD_READ_OK: &str = "fd_read_ok";
pub const FD_READ_FAILED: &str = "fd_read_failed";
pub const FD_POLL_FAILED: &str = "fd_poll_failed";
pub const FD_POLL_HANGUP: &str = "fd_poll_hangup";
pub const MESSAGE_KIND_DISCARDED: &str = "message_kind_discarded";

// Block runtime events.
pub const RUNTIME_THREAD_NAME_FALLBACK: &str = "runtime_thread_name_fallback";
pub const RUNTIME_SPAWN_START: &str = "runtime_spawn_start";
pub const RUNTIME_SPAWN_OK: &str = "runtime_spawn_ok";
pub const RUNTIME_SPAWN_FAILED: &str = "runtime_spawn_failed";
pub const RUNTIME_LOOP_STOPPED: &str = "runtime_loop_stopped";
pub const RUNTIME_JOIN_FAILED: &str = "runtime_join_failed";

// Factory events.
pub const FACTORY_MAKE_OK: &str = "factory_make_ok";
pub const FACTORY_MAKE_FAILED: &str = "factory_make_failed";
