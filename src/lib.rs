pub mod core;
pub mod index;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                           WORDEX STRUCT ARCHITECTURE                         │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── CORE LAYER ──────────────────────────────────┐
│                                                                              │
│  ┌──────────────────┐  ┌──────────────────┐  ┌────────────────────────────┐  │
│  │ struct Word      │  │ struct DocId     │  │ struct DocDetails          │  │
│  │ • 0: String      │  │ • 0: String      │  │ • doc_id: DocId            │  │
│  └──────────────────┘  │   (validated)    │  │ • weight: u64              │  │
│                        └──────────────────┘  └────────────────────────────┘  │
│  ┌──────────────────────────────┐  ┌──────────────────────────────────────┐  │
│  │ struct IndexConfig           │  │ struct Error                         │  │
│  │ • kind: IndexKind            │  │ • kind: ErrorKind                    │  │
│  │ • merge_policy: MergePolicy  │  │ • context: String                    │  │
│  │ • max_entries: Option<usize> │  └──────────────────────────────────────┘  │
│  │ • table: HashTableConfig     │                                            │
│  └──────────────────────────────┘                                            │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── INDEX LAYER ──────────────────────────────────┐
│                                                                              │
│  ┌──────────────────────────────────────────────────────────────────────┐    │
│  │ trait Index                                                          │    │
│  │ add_occurrence / add / lookup / remove / size / clear / render       │    │
│  │ data_type / entries / frequent_words                                 │    │
│  └───────────────┬──────────────────────────────────┬───────────────────┘    │
│                  │                                  │                        │
│  ┌───────────────▼──────────────┐   ┌───────────────▼──────────────────┐     │
│  │ struct AvlIndex              │   │ struct HashIndex                 │     │
│  │ • tree: AvlTree<WordEntry>   │   │ • table: HashTable               │     │
│  │ • config: IndexConfig        │   │ • config: IndexConfig            │     │
│  └───────────────┬──────────────┘   └───────────────┬──────────────────┘     │
│                  │                                  │                        │
│  ┌───────────────▼──────────────┐   ┌───────────────▼──────────────────┐     │
│  │ struct AvlTree<T: Keyed>     │   │ struct HashTable                 │     │
│  │ • root: Option<Box<Node<T>>> │   │ • buckets: Vec<Vec<WordEntry>>   │     │
│  │ • len: usize                 │   │ • len / rehashes                 │     │
│  └──────────────────────────────┘   └──────────────────────────────────┘     │
│                                                                              │
│  ┌──────────────────────────────┐   ┌──────────────────────────────────┐     │
│  │ struct WordEntry             │   │ struct DocList                   │     │
│  │ • word: Word                 │──▶│ • docs: Vec<DocDetails>          │     │
│  │ • docs: DocList              │   │ • total_weight: u64              │     │
│  └──────────────────────────────┘   └──────────────────────────────────┘     │
│                                                                              │
│  ┌──────────────────────────────────────────────────────────────────────┐    │
│  │ struct SharedIndex<I: Index>                                         │    │
│  │ • inner: Arc<RwLock<I>>       // single writer, many readers         │    │
│  └──────────────────────────────────────────────────────────────────────┘    │
└──────────────────────────────────────────────────────────────────────────────┘
*/
