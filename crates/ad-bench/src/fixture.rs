use std::fs;
use std::path::Path;

/// TypeScript service with typed, optional, defaulted and property parameters.
pub const TS_SERVICE: &str = r#"import { Db } from './db';

export interface User {
    id: number;
    name: string;
}

export class UserService {
    constructor(private readonly db: Db, public cacheSize: number = 100) {}

    async find(id: number): Promise<User | null> {
        return this.db.get(id);
    }

    list({ offset = 0, limit = 50 }: Page = {}): User[] {
        return this.db.range(offset, limit);
    }

    rename(user: User, name?: string) {
        user.name = name ?? user.name;
        return user;
    }

    get size() {
        return this.cacheSize;
    }

    set size(value: number) {
        this.cacheSize = value;
    }
}

export function createService(db: Db, ...plugins: Plugin[]): UserService {
    return new UserService(db);
}
"#;

/// JavaScript module mixing declarations, arrows, callbacks and destructuring.
pub const JS_HANDLERS: &str = r#"const express = require('express');

/**
 * Already documented.
 */
function health() {
    return { ok: true };
}

function parseQuery({ page = 1, size = 20, sort: { field = 'id', dir = 'asc' } = {} }) {
    return page * size;
}

const toPair = ([key, value = null]) => [key, value];

export const handlers = {
    list: async (req, res) => {
        res.json([]);
    },
    remove(req, res) {
        return res.status(204);
    },
};

module.exports.retry = function (fn, attempts = 3, ...args) {
    return fn(...args);
};

[1, 2, 3].map((n) => n * 2);

function* ids(start = 0) {
    yield start;
}
"#;

/// Create a small project with one TypeScript and one JavaScript module.
pub fn create_mixed_project(root: &Path) {
    let src = root.join("src");
    let api = src.join("api");
    fs::create_dir_all(&api).unwrap();

    fs::write(src.join("service.ts"), TS_SERVICE).unwrap();
    fs::write(api.join("handlers.js"), JS_HANDLERS).unwrap();

    let vendored = root.join("node_modules").join("left-pad");
    fs::create_dir_all(&vendored).unwrap();
    fs::write(vendored.join("index.js"), "module.exports = function (s) { return s; };\n").unwrap();
}

/// Create `files_per_language` copies of each fixture module under `root/src`.
pub fn create_scaled_project(root: &Path, files_per_language: usize) {
    for i in 0..files_per_language {
        let dir = root.join("src").join(format!("mod_{:04}", i / 100));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("service_{i}.ts")), TS_SERVICE).unwrap();
        fs::write(dir.join(format!("handlers_{i}.js")), JS_HANDLERS).unwrap();
    }
}
