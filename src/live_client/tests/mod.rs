// Tests for live match polling
