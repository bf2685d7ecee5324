mod sentinel {
  sentinel_test!(sentinel, should_select_first_active_sentinel);
  sentinel_test!(sentinel, should_fail_discovery_when_all_sentinels_down);
  sentinel_test!(sentinel, should_skip_unresponsive_sentinel);
  sentinel_test!(sentinel, should_list_masters);
  sentinel_test!(sentinel, should_trigger_failover);
  sentinel_test!(sentinel, should_reject_blank_master_without_sending);
  sentinel_test!(sentinel, should_error_after_close);
  sentinel_test!(sentinel, should_time_out_commands);
  sentinel_test!(sentinel, should_drop_connection_after_command_timeout);
  sentinel_test!(sentinel, should_use_connected_transport_without_reconnecting);
  sentinel_test!(sentinel, should_error_connecting_to_closed_port);
}
