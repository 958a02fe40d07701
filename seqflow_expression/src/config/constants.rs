pub mod compile_time {
    pub mod preprocess {
        /// Maximum expression length in characters
        /// Bounds per-call buffer growth before any scanning starts
        pub const MAX_EXPRESSION_LENGTH: usize = 4_096;

        /// Initial capacity for the per-call character buffer
        pub const EXPRESSION_BUFFER_CAPACITY: usize = 256;

        /// Initial capacity for the per-call argument cache
        pub const ARGUMENT_CACHE_CAPACITY: usize = 16;
    }

    pub mod arrange {
        /// Maximum length of a run of operator characters between operands
        /// Compositions are precomputed up to exactly this length
        pub const MAX_TOKEN_RUN_LENGTH: usize = 7;
    }

    pub mod parse {
        /// Default budget for the backtracking search, counted in state
        /// transitions plus backtrack restores per parse call
        pub const DEFAULT_MAX_SEARCH_STEPS: usize = 100_000;

        /// Initial capacity for the operator and ambiguity stacks
        pub const STACK_CAPACITY: usize = 16;

        /// Initial capacity for the per-candidate sub-expression cache
        pub const EXPRESSION_CACHE_CAPACITY: usize = 32;
    }

    pub mod logging {
        /// Maximum buffered events in the memory logger
        pub const LOG_BUFFER_SIZE: usize = 10_000;
    }
}
