mod webhook_mock;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - flow_tests: The classification flow with stub classifiers and notifiers
// - server_tests: The HTTP surface serving the flow
// - smoke_tests: Configuration and component wiring
// - webhook_mock: Webhook delivery against a mock HTTP server
