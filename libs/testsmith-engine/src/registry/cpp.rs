// C++ catalog entries. Linked structures are passed as raw pointers,
// `Interval` by value. Parsers take the `JsonValue` tree from the runtime
// below; serializers return one.

use super::CompositeDescriptor;

pub const LIST_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"struct ListNode {
    int val;
    ListNode *next;
    ListNode() : val(0), next(nullptr) {}
    ListNode(int x) : val(x), next(nullptr) {}
    ListNode(int x, ListNode *next) : val(x), next(next) {}
};"#,
    parser: r#"ListNode* parseListNode(const JsonValue& json) {
    if (json.kind != JsonValue::Array || json.items.empty()) return nullptr;
    ListNode* head = new ListNode(harnessInt(json.items[0]));
    ListNode* cur = head;
    for (size_t i = 1; i < json.items.size(); i++) {
        cur->next = new ListNode(harnessInt(json.items[i]));
        cur = cur->next;
    }
    return head;
}"#,
    serializer: r#"JsonValue serializeListNode(ListNode* head) {
    JsonValue out = harnessArray();
    for (ListNode* cur = head; cur != nullptr; cur = cur->next) {
        out.items.push_back(toJsonValue(cur->val));
    }
    return out;
}"#,
};

pub const TREE_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"struct TreeNode {
    int val;
    TreeNode *left;
    TreeNode *right;
    TreeNode() : val(0), left(nullptr), right(nullptr) {}
    TreeNode(int x) : val(x), left(nullptr), right(nullptr) {}
    TreeNode(int x, TreeNode *left, TreeNode *right) : val(x), left(left), right(right) {}
};"#,
    parser: r#"TreeNode* parseTreeNode(const JsonValue& json) {
    if (json.kind != JsonValue::Array || json.items.empty() || json.items[0].kind == JsonValue::Null) return nullptr;
    const vector<JsonValue>& values = json.items;
    TreeNode* root = new TreeNode(harnessInt(values[0]));
    queue<TreeNode*> pending;
    pending.push(root);
    size_t i = 1;
    while (!pending.empty() && i < values.size()) {
        TreeNode* node = pending.front();
        pending.pop();
        if (i < values.size() && values[i].kind != JsonValue::Null) {
            node->left = new TreeNode(harnessInt(values[i]));
            pending.push(node->left);
        }
        i++;
        if (i < values.size() && values[i].kind != JsonValue::Null) {
            node->right = new TreeNode(harnessInt(values[i]));
            pending.push(node->right);
        }
        i++;
    }
    return root;
}"#,
    serializer: r#"JsonValue serializeTreeNode(TreeNode* root) {
    JsonValue out = harnessArray();
    queue<TreeNode*> pending;
    pending.push(root);
    while (!pending.empty()) {
        TreeNode* node = pending.front();
        pending.pop();
        if (node == nullptr) {
            out.items.push_back(JsonValue());
            continue;
        }
        out.items.push_back(toJsonValue(node->val));
        pending.push(node->left);
        pending.push(node->right);
    }
    while (!out.items.empty() && out.items.back().kind == JsonValue::Null) out.items.pop_back();
    return out;
}"#,
};

pub const INTERVAL: CompositeDescriptor = CompositeDescriptor {
    definition: r#"struct Interval {
    int start;
    int end;
    Interval() : start(0), end(0) {}
    Interval(int s, int e) : start(s), end(e) {}
};"#,
    parser: r#"Interval parseInterval(const JsonValue& json) {
    if (json.kind != JsonValue::Array || json.items.size() < 2) return Interval();
    return Interval(harnessInt(json.items[0]), harnessInt(json.items[1]));
}"#,
    serializer: r#"JsonValue serializeInterval(const Interval& interval) {
    JsonValue out = harnessArray();
    out.items.push_back(toJsonValue(interval.start));
    out.items.push_back(toJsonValue(interval.end));
    return out;
}"#,
};

pub const GRAPH_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"class GraphNode {
public:
    int val;
    vector<GraphNode*> neighbors;
    GraphNode() : val(0) {}
    GraphNode(int x) : val(x) {}
    GraphNode(int x, vector<GraphNode*> neighbors) : val(x), neighbors(neighbors) {}
};"#,
    parser: r#"GraphNode* parseGraphNode(const JsonValue& json) {
    if (json.kind != JsonValue::Array || json.items.empty()) return nullptr;
    vector<GraphNode*> nodes;
    for (size_t i = 0; i < json.items.size(); i++) nodes.push_back(new GraphNode((int) i + 1));
    for (size_t i = 0; i < json.items.size(); i++) {
        for (const JsonValue& v : json.items[i].items) nodes[i]->neighbors.push_back(nodes[harnessInt(v) - 1]);
    }
    return nodes[0];
}"#,
    serializer: r#"JsonValue serializeGraphNode(GraphNode* node) {
    JsonValue out = harnessArray();
    if (node == nullptr) return out;
    map<int, GraphNode*> seen;
    queue<GraphNode*> pending;
    seen[node->val] = node;
    pending.push(node);
    while (!pending.empty()) {
        GraphNode* cur = pending.front();
        pending.pop();
        for (GraphNode* next : cur->neighbors) {
            if (next != nullptr && seen.find(next->val) == seen.end()) {
                seen[next->val] = next;
                pending.push(next);
            }
        }
    }
    for (auto& entry : seen) {
        JsonValue row = harnessArray();
        for (GraphNode* m : entry.second->neighbors) row.items.push_back(toJsonValue(m->val));
        out.items.push_back(row);
    }
    return out;
}"#,
};

pub const TRIE_NODE: CompositeDescriptor = CompositeDescriptor {
    definition: r#"struct TrieNode {
    map<char, TrieNode*> children;
    bool isEnd;
    TrieNode() : isEnd(false) {}
};"#,
    parser: r#"TrieNode* parseTrieNode(const JsonValue& json) {
    if (json.kind != JsonValue::Object) return nullptr;
    TrieNode* node = new TrieNode();
    for (size_t i = 0; i < json.keys.size(); i++) {
        if (json.keys[i] == "isEnd") {
            node->isEnd = json.values[i].kind == JsonValue::Bool && json.values[i].boolean;
        } else if (!json.keys[i].empty()) {
            TrieNode* child = parseTrieNode(json.values[i]);
            if (child != nullptr) node->children[json.keys[i][0]] = child;
        }
    }
    return node;
}"#,
    serializer: r#"JsonValue serializeTrieNode(TrieNode* node) {
    JsonValue out = harnessObject();
    if (node == nullptr) return out;
    if (node->isEnd) harnessSet(out, "isEnd", toJsonValue(true));
    for (auto& entry : node->children) {
        harnessSet(out, string(1, entry.first), serializeTrieNode(entry.second));
    }
    return out;
}"#,
};

/// JSON value model, reader and canonical writer, plus the builtin
/// scalar overloads of `toJsonValue`. Emitted before the composite
/// parsers and serializers.
pub const RUNTIME_CORE: &str = r#"struct JsonValue {
    enum Kind { Null, Bool, Number, String, Array, Object };
    Kind kind = Null;
    bool boolean = false;
    bool integral = false;
    long long integer = 0;
    double number = 0;
    string text;
    vector<JsonValue> items;
    vector<string> keys;
    vector<JsonValue> values;
};

JsonValue harnessArray() {
    JsonValue v;
    v.kind = JsonValue::Array;
    return v;
}

JsonValue harnessObject() {
    JsonValue v;
    v.kind = JsonValue::Object;
    return v;
}

void harnessSet(JsonValue& object, const string& key, const JsonValue& value) {
    for (size_t i = 0; i < object.keys.size(); i++) {
        if (object.keys[i] == key) {
            object.values[i] = value;
            return;
        }
    }
    object.keys.push_back(key);
    object.values.push_back(value);
}

int harnessInt(const JsonValue& v) {
    if (v.kind != JsonValue::Number) return 0;
    return v.integral ? (int) v.integer : (int) v.number;
}

struct HarnessJsonReader {
    const string& text;
    size_t pos = 0;

    explicit HarnessJsonReader(const string& text) : text(text) {}

    void skip() {
        while (pos < text.size() && isspace((unsigned char) text[pos])) pos++;
    }

    char peek() {
        skip();
        return pos < text.size() ? text[pos] : '\0';
    }

    JsonValue read() {
        char c = peek();
        JsonValue v;
        if (c == '[') {
            pos++;
            v.kind = JsonValue::Array;
            if (peek() == ']') { pos++; return v; }
            while (pos < text.size()) {
                v.items.push_back(read());
                char sep = peek();
                pos++;
                if (sep != ',') break;
            }
            return v;
        }
        if (c == '{') {
            pos++;
            v.kind = JsonValue::Object;
            if (peek() == '}') { pos++; return v; }
            while (pos < text.size()) {
                peek();
                string key = readString();
                peek();
                pos++;
                harnessSet(v, key, read());
                char sep = peek();
                pos++;
                if (sep != ',') break;
            }
            return v;
        }
        if (c == '"') {
            v.kind = JsonValue::String;
            v.text = readString();
            return v;
        }
        if (text.compare(pos, 4, "true") == 0) { pos += 4; v.kind = JsonValue::Bool; v.boolean = true; return v; }
        if (text.compare(pos, 5, "false") == 0) { pos += 5; v.kind = JsonValue::Bool; return v; }
        if (text.compare(pos, 4, "null") == 0) { pos += 4; return v; }
        size_t start = pos;
        while (pos < text.size() && string("+-0123456789.eE").find(text[pos]) != string::npos) pos++;
        string literal = text.substr(start, pos - start);
        v.kind = JsonValue::Number;
        v.number = literal.empty() ? 0 : strtod(literal.c_str(), nullptr);
        if (!literal.empty() && literal.find_first_of(".eE") == string::npos) {
            errno = 0;
            long long parsed = strtoll(literal.c_str(), nullptr, 10);
            if (errno == 0) {
                v.integral = true;
                v.integer = parsed;
            }
        }
        return v;
    }

    string readString() {
        string out;
        pos++;
        while (pos < text.size()) {
            char c = text[pos++];
            if (c == '"') break;
            if (c != '\\') { out += c; continue; }
            char e = text[pos++];
            switch (e) {
                case 'n': out += '\n'; break;
                case 't': out += '\t'; break;
                case 'r': out += '\r'; break;
                case 'b': out += '\b'; break;
                case 'f': out += '\f'; break;
                case 'u': {
                    unsigned code = (unsigned) strtoul(text.substr(pos, 4).c_str(), nullptr, 16);
                    pos += 4;
                    if (code < 0x80) {
                        out += (char) code;
                    } else if (code < 0x800) {
                        out += (char) (0xC0 | (code >> 6));
                        out += (char) (0x80 | (code & 0x3F));
                    } else {
                        out += (char) (0xE0 | (code >> 12));
                        out += (char) (0x80 | ((code >> 6) & 0x3F));
                        out += (char) (0x80 | (code & 0x3F));
                    }
                    break;
                }
                default: out += e;
            }
        }
        return out;
    }
};

JsonValue harnessParseJson(const string& text) {
    HarnessJsonReader reader(text);
    return reader.read();
}

string harnessFormatDouble(double d) {
    if (std::isnan(d) || std::isinf(d)) return "null";
    if (d == std::floor(d) && std::fabs(d) < 1e15) return to_string((long long) d);
    for (int precision = 1; precision <= 17; precision++) {
        ostringstream out;
        out << setprecision(precision) << d;
        if (strtod(out.str().c_str(), nullptr) == d) return out.str();
    }
    ostringstream out;
    out << setprecision(17) << d;
    return out.str();
}

void harnessWriteString(ostringstream& out, const string& s) {
    out << '"';
    for (unsigned char c : s) {
        switch (c) {
            case '"': out << "\\\""; break;
            case '\\': out << "\\\\"; break;
            case '\n': out << "\\n"; break;
            case '\r': out << "\\r"; break;
            case '\t': out << "\\t"; break;
            case '\b': out << "\\b"; break;
            case '\f': out << "\\f"; break;
            default:
                if (c < 0x20) {
                    char buf[8];
                    snprintf(buf, sizeof(buf), "\\u%04x", (unsigned) c);
                    out << buf;
                } else {
                    out << (char) c;
                }
        }
    }
    out << '"';
}

void harnessWriteJson(ostringstream& out, const JsonValue& v) {
    switch (v.kind) {
        case JsonValue::Null: out << "null"; break;
        case JsonValue::Bool: out << (v.boolean ? "true" : "false"); break;
        case JsonValue::Number:
            if (v.integral) out << v.integer;
            else out << harnessFormatDouble(v.number);
            break;
        case JsonValue::String: harnessWriteString(out, v.text); break;
        case JsonValue::Array:
            out << '[';
            for (size_t i = 0; i < v.items.size(); i++) {
                if (i > 0) out << ',';
                harnessWriteJson(out, v.items[i]);
            }
            out << ']';
            break;
        case JsonValue::Object: {
            vector<size_t> order(v.keys.size());
            for (size_t i = 0; i < order.size(); i++) order[i] = i;
            sort(order.begin(), order.end(), [&](size_t a, size_t b) { return v.keys[a] < v.keys[b]; });
            out << '{';
            for (size_t i = 0; i < order.size(); i++) {
                if (i > 0) out << ',';
                harnessWriteString(out, v.keys[order[i]]);
                out << ':';
                harnessWriteJson(out, v.values[order[i]]);
            }
            out << '}';
            break;
        }
    }
}

string harnessStringify(const JsonValue& v) {
    ostringstream out;
    harnessWriteJson(out, v);
    return out.str();
}

int harnessCompare(const JsonValue& a, const JsonValue& b) {
    if (a.kind == JsonValue::Number && b.kind == JsonValue::Number) {
        double x = a.integral ? (double) a.integer : a.number;
        double y = b.integral ? (double) b.integer : b.number;
        return x < y ? -1 : (x > y ? 1 : 0);
    }
    return harnessStringify(a).compare(harnessStringify(b));
}

JsonValue harnessNormalize(const JsonValue& v) {
    JsonValue out = v;
    if (v.kind == JsonValue::Array) {
        for (JsonValue& item : out.items) item = harnessNormalize(item);
        stable_sort(out.items.begin(), out.items.end(), [](const JsonValue& a, const JsonValue& b) {
            return harnessCompare(a, b) < 0;
        });
    } else if (v.kind == JsonValue::Object) {
        for (JsonValue& value : out.values) value = harnessNormalize(value);
    }
    return out;
}

JsonValue toJsonValue(const JsonValue& v) { return v; }

JsonValue toJsonValue(bool b) {
    JsonValue v;
    v.kind = JsonValue::Bool;
    v.boolean = b;
    return v;
}

JsonValue toJsonValue(long long n) {
    JsonValue v;
    v.kind = JsonValue::Number;
    v.integral = true;
    v.integer = n;
    v.number = (double) n;
    return v;
}

JsonValue toJsonValue(int n) { return toJsonValue((long long) n); }
JsonValue toJsonValue(long n) { return toJsonValue((long long) n); }
JsonValue toJsonValue(short n) { return toJsonValue((long long) n); }
JsonValue toJsonValue(unsigned n) { return toJsonValue((long long) n); }
JsonValue toJsonValue(unsigned long n) { return toJsonValue((long long) n); }
JsonValue toJsonValue(unsigned long long n) { return toJsonValue((long long) n); }

JsonValue toJsonValue(double d) {
    JsonValue v;
    if (std::isnan(d) || std::isinf(d)) return v;
    v.kind = JsonValue::Number;
    v.number = d;
    if (d == std::floor(d) && std::fabs(d) < 1e15) {
        v.integral = true;
        v.integer = (long long) d;
    }
    return v;
}

JsonValue toJsonValue(float f) { return toJsonValue((double) f); }

JsonValue toJsonValue(const string& s) {
    JsonValue v;
    v.kind = JsonValue::String;
    v.text = s;
    return v;
}

JsonValue toJsonValue(const char* s) { return toJsonValue(string(s == nullptr ? "" : s)); }
JsonValue toJsonValue(char c) { return toJsonValue(string(1, c)); }"#;

/// Container templates, the `JsonConvert` family used by the judge
/// harness and opaque literals, output capture and the verdict builder.
/// Emitted after the generated composite overloads.
pub const RUNTIME_TEMPLATES: &str = r#"template <typename T> JsonValue toJsonValue(const vector<T>& items);
template <typename A, typename B> JsonValue toJsonValue(const pair<A, B>& p);
template <typename K, typename V> JsonValue toJsonValue(const map<K, V>& m);
template <typename K, typename V> JsonValue toJsonValue(const unordered_map<K, V>& m);
template <typename T> JsonValue toJsonValue(const set<T>& items);
template <typename T> JsonValue toJsonValue(const unordered_set<T>& items);

template <typename T> JsonValue toJsonValue(const vector<T>& items) {
    JsonValue out = harnessArray();
    for (const auto& item : items) out.items.push_back(toJsonValue(item));
    return out;
}

template <typename A, typename B> JsonValue toJsonValue(const pair<A, B>& p) {
    JsonValue out = harnessArray();
    out.items.push_back(toJsonValue(p.first));
    out.items.push_back(toJsonValue(p.second));
    return out;
}

template <typename K, typename V> JsonValue toJsonValue(const map<K, V>& m) {
    JsonValue out = harnessObject();
    for (const auto& entry : m) {
        JsonValue key = toJsonValue(entry.first);
        harnessSet(out, key.kind == JsonValue::String ? key.text : harnessStringify(key), toJsonValue(entry.second));
    }
    return out;
}

template <typename K, typename V> JsonValue toJsonValue(const unordered_map<K, V>& m) {
    return toJsonValue(map<K, V>(m.begin(), m.end()));
}

template <typename T> JsonValue toJsonValue(const set<T>& items) {
    JsonValue out = harnessArray();
    for (const auto& item : items) out.items.push_back(toJsonValue(item));
    return out;
}

template <typename T> JsonValue toJsonValue(const unordered_set<T>& items) {
    return toJsonValue(set<T>(items.begin(), items.end()));
}

template <typename T> struct JsonConvert {
    static T from(const JsonValue&) { return T(); }
};

template <> struct JsonConvert<JsonValue> {
    static JsonValue from(const JsonValue& v) { return v; }
};

template <> struct JsonConvert<int> {
    static int from(const JsonValue& v) { return harnessInt(v); }
};

template <> struct JsonConvert<long> {
    static long from(const JsonValue& v) { return v.integral ? (long) v.integer : (long) v.number; }
};

template <> struct JsonConvert<long long> {
    static long long from(const JsonValue& v) { return v.integral ? v.integer : (long long) v.number; }
};

template <> struct JsonConvert<double> {
    static double from(const JsonValue& v) { return v.integral ? (double) v.integer : v.number; }
};

template <> struct JsonConvert<float> {
    static float from(const JsonValue& v) { return (float) JsonConvert<double>::from(v); }
};

template <> struct JsonConvert<bool> {
    static bool from(const JsonValue& v) { return v.kind == JsonValue::Bool && v.boolean; }
};

template <> struct JsonConvert<char> {
    static char from(const JsonValue& v) {
        if (v.kind == JsonValue::String) return v.text.empty() ? '\0' : v.text[0];
        return (char) harnessInt(v);
    }
};

template <> struct JsonConvert<string> {
    static string from(const JsonValue& v) { return v.kind == JsonValue::String ? v.text : harnessStringify(v); }
};

template <typename T> struct JsonConvert<vector<T>> {
    static vector<T> from(const JsonValue& v) {
        vector<T> out;
        for (const JsonValue& item : v.items) out.push_back(JsonConvert<T>::from(item));
        return out;
    }
};

template <typename A, typename B> struct JsonConvert<pair<A, B>> {
    static pair<A, B> from(const JsonValue& v) {
        if (v.items.size() < 2) return pair<A, B>();
        return make_pair(JsonConvert<A>::from(v.items[0]), JsonConvert<B>::from(v.items[1]));
    }
};

struct HarnessCapture {
    ostringstream buffer;
    streambuf* saved;

    HarnessCapture() : saved(cout.rdbuf(buffer.rdbuf())) {}
    ~HarnessCapture() { restore(); }

    void restore() {
        if (saved != nullptr) {
            cout.rdbuf(saved);
            saved = nullptr;
        }
    }
};

string harnessVerdict(const string& status, const string& expectedJson, const string& actualJson, double time, const string& logs, bool failed, const string& error) {
    ostringstream out;
    out << "{\"status\":";
    harnessWriteString(out, status);
    out << ",\"expected\":" << expectedJson;
    out << ",\"actual\":" << actualJson;
    out << ",\"time\":" << harnessFormatDouble(time);
    if (!logs.empty()) {
        out << ",\"logs\":";
        harnessWriteString(out, logs);
    }
    if (failed) {
        out << ",\"error\":";
        harnessWriteString(out, error);
    }
    out << '}';
    return out.str();
}"#;
