// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Workflow coordination only. No parsing, no tokenizing, no
// file formats here: those live in Layer 4 (data) and Layer 6
// (infra). Printing belongs to Layer 1.

// The annotation -> tokenizer.json + captions_data.npz run
pub mod prepare_use_case;

// Encode captions with a previously saved tokenizer
pub mod encode_use_case;
