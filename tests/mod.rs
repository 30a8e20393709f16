
// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Configuration and query windows, no calendar needed
// - google_calendar_mock: Queries and edits against an in-memory calendar store
